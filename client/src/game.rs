use crate::input::Direction;
use log::debug;
use rand::Rng;
use shared::{
    clamp_token, decode_snapshot, encode_input, sanitize_name, CodecError, HazardView,
    InputFrame, PlayerView, Rgb, Snapshot, ARENA_HEIGHT, ARENA_WIDTH, PLAYER_SPEED,
};
use std::collections::HashSet;

/// The token this client steers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPlayer {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
}

impl LocalPlayer {
    /// Places the token at the center of the arena
    pub fn new(name: &str, color: Rgb) -> Self {
        Self {
            name: sanitize_name(name),
            x: ARENA_WIDTH / 2,
            y: ARENA_HEIGHT / 2,
            color,
        }
    }

    /// Same as `new` with a color picked once for the session
    pub fn with_random_color<R: Rng + ?Sized>(name: &str, rng: &mut R) -> Self {
        let color = Rgb::new(rng.gen(), rng.gen(), rng.gen());
        Self::new(name, color)
    }

    /// Moves by `PLAYER_SPEED` per held direction, keeping the token inside the arena
    pub fn step(&mut self, held: &HashSet<Direction>) {
        let mut x = self.x;
        let mut y = self.y;
        for dir in held {
            let (dx, dy) = dir.delta();
            x += dx * PLAYER_SPEED;
            y += dy * PLAYER_SPEED;
        }
        (self.x, self.y) = clamp_token(x, y);
    }

    pub fn frame(&self) -> InputFrame {
        InputFrame {
            name: self.name.clone(),
            x: self.x,
            y: self.y,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    /// Before the first hazard; the how-to-play screen and countdown are shown
    Countdown,
    /// Round in progress
    Running,
    /// Neither clock is shown; the leaderboard is
    Finished,
}

/// Everything the renderer needs from one snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub players: Vec<PlayerView>,
    pub hazards: Vec<HazardView>,
    pub countdown: Option<String>,
    pub timer: Option<String>,
}

impl From<Snapshot> for Scene {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            players: snapshot.players,
            hazards: snapshot.hazards,
            countdown: snapshot.countdown,
            timer: snapshot.timer,
        }
    }
}

impl Scene {
    pub fn phase(&self) -> ScenePhase {
        if self.countdown.is_some() {
            ScenePhase::Countdown
        } else if self.timer.is_some() {
            ScenePhase::Running
        } else {
            ScenePhase::Finished
        }
    }

    pub fn countdown_seconds(&self) -> Option<f32> {
        self.countdown.as_deref()?.parse().ok()
    }

    pub fn timer_seconds(&self) -> Option<f32> {
        self.timer.as_deref()?.parse().ok()
    }

    pub fn standings(&self) -> Vec<Standing> {
        rank_standings(&self.players)
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub rank: u32,
    pub name: String,
    pub score: u32,
}

/// Sorts by ascending score; equal scores share a rank and the next distinct
/// score gets the previous rank plus one.
pub fn rank_standings(players: &[PlayerView]) -> Vec<Standing> {
    let mut sorted: Vec<&PlayerView> = players.iter().collect();
    sorted.sort_by_key(|player| player.score);

    let mut rank = 0;
    let mut previous = None;
    sorted
        .into_iter()
        .map(|player| {
            if previous != Some(player.score) {
                rank += 1;
                previous = Some(player.score);
            }
            Standing {
                rank,
                name: player.name.clone(),
                score: player.score,
            }
        })
        .collect()
}

/// Client half of the protocol: outbound frames and the latest scene
pub struct ClientSync {
    player: LocalPlayer,
    scene: Option<Scene>,
    received: u64,
}

impl ClientSync {
    pub fn new(player: LocalPlayer) -> Self {
        Self {
            player,
            scene: None,
            received: 0,
        }
    }

    /// Applies one tick of held keys and encodes the resulting input frame
    pub fn outbound(&mut self, held: &HashSet<Direction>) -> Result<Vec<u8>, CodecError> {
        self.player.step(held);
        encode_input(&self.player.frame())
    }

    /// Decodes a snapshot; on error the previous scene is kept
    pub fn receive(&mut self, bytes: &[u8]) -> Result<&Scene, CodecError> {
        let scene = Scene::from(decode_snapshot(bytes)?);
        self.received += 1;
        if self.scene.as_ref().map(Scene::phase) != Some(scene.phase()) {
            debug!("Scene phase now {:?}", scene.phase());
        }
        Ok(self.scene.insert(scene))
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn player(&self) -> &LocalPlayer {
        &self.player
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}
