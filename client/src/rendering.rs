use crate::game::{Scene, ScenePhase, Standing};
use macroquad::prelude::*;
use shared::{HazardView, PlayerView, Rgb, PLAYER_HALF_HEIGHT, PLAYER_HALF_WIDTH};

const BACKGROUND: Color = Color::new(0.96, 0.96, 0.94, 1.0);
const GOLD: Color = Color::new(252.0 / 255.0, 194.0 / 255.0, 1.0 / 255.0, 1.0);
const SILVER: Color = Color::new(167.0 / 255.0, 167.0 / 255.0, 173.0 / 255.0, 1.0);
const BRONZE: Color = Color::new(167.0 / 255.0, 112.0 / 255.0, 68.0 / 255.0, 1.0);

const HOW_TO_PLAY: [&str; 4] = [
    "1. Avoid the circles",
    "2. Lowest score wins!",
    "Your score is the red number",
    "underneath your name",
];

/// Font size, color and line advance for a leaderboard rank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankStyle {
    pub font_size: f32,
    pub color: Color,
    pub advance: f32,
}

pub fn rank_style(rank: u32) -> RankStyle {
    match rank {
        1 => RankStyle {
            font_size: 50.0,
            color: GOLD,
            advance: 50.0,
        },
        2 => RankStyle {
            font_size: 40.0,
            color: SILVER,
            advance: 40.0,
        },
        3 => RankStyle {
            font_size: 30.0,
            color: BRONZE,
            advance: 30.0,
        },
        _ => RankStyle {
            font_size: 25.0,
            color: BLACK,
            advance: 25.0,
        },
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

pub struct Renderer {
    width: f32,
    height: f32,
}

impl Renderer {
    pub fn new(width: i32, height: i32) -> Self {
        Renderer {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn render(&self, scene: Option<&Scene>) {
        clear_background(BACKGROUND);

        let Some(scene) = scene else {
            self.draw_centered("Waiting for server...", self.height / 2.0, 40.0, DARKGRAY);
            return;
        };

        for hazard in &scene.hazards {
            self.draw_hazard(hazard);
        }

        match scene.phase() {
            ScenePhase::Countdown => {
                self.draw_how_to_play();
                if let Some(countdown) = &scene.countdown {
                    self.draw_centered(countdown, self.height / 2.0, 100.0, RED);
                }
            }
            ScenePhase::Running => {
                if let Some(timer) = &scene.timer {
                    self.draw_centered(timer, self.height / 2.0, 100.0, BLUE);
                }
            }
            ScenePhase::Finished => self.draw_leaderboard(&scene.standings()),
        }

        for player in &scene.players {
            self.draw_player(player);
        }
    }

    fn draw_centered(&self, text: &str, y: f32, font_size: f32, color: Color) {
        let dims = measure_text(text, None, font_size as u16, 1.0);
        draw_text(text, self.width / 2.0 - dims.width / 2.0, y, font_size, color);
    }

    fn draw_centered_at(&self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        let dims = measure_text(text, None, font_size as u16, 1.0);
        draw_text(text, x - dims.width / 2.0, y, font_size, color);
    }

    fn draw_hazard(&self, hazard: &HazardView) {
        let color = to_color(hazard.color);
        let (x, y) = (hazard.x as f32, hazard.y as f32);
        draw_circle_lines(x, y, hazard.full_radius as f32, 5.0, color);
        draw_circle(x, y, hazard.current_radius as f32, color);
    }

    fn draw_player(&self, player: &PlayerView) {
        let font_size = 20.0;
        let (x, y) = (player.x as f32, player.y as f32);
        let half_w = PLAYER_HALF_WIDTH as f32;
        let half_h = PLAYER_HALF_HEIGHT as f32;

        draw_rectangle(
            x - half_w,
            y - half_h,
            half_w * 2.0,
            half_h * 2.0,
            to_color(player.color),
        );
        self.draw_centered_at(&player.name, x, y - half_h - font_size, font_size, BLACK);
        self.draw_centered_at(
            &player.score.to_string(),
            x,
            y - half_h - font_size / 3.0 + 3.0,
            font_size,
            RED,
        );
    }

    fn draw_how_to_play(&self) {
        let mut y = self.height / 2.0 - 200.0;
        for line in HOW_TO_PLAY {
            self.draw_centered(line, y, 20.0, BLACK);
            y += 30.0;
        }
    }

    fn draw_leaderboard(&self, standings: &[Standing]) {
        self.draw_centered("Final Standings (^-^)", 70.0, 60.0, BLACK);

        let mut y = 140.0;
        for standing in standings {
            let style = rank_style(standing.rank);
            let line = format!("#{} {}", standing.rank, standing.name);
            self.draw_centered(&line, y, style.font_size, style.color);
            y += style.advance;
        }
    }
}
