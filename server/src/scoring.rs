//! Awards score to players caught inside hazards that finish growing

use crate::hazards::Hazard;
use crate::phase::PhaseController;
use crate::player_registry::PlayerRegistry;

/// True when (x, y) lies strictly inside the hazard's full radius.
///
/// A point exactly on the circle is outside.
pub fn is_caught(hazard: &Hazard, x: i32, y: i32) -> bool {
    let dx = x as i64 - hazard.x as i64;
    let dy = y as i64 - hazard.y as i64;
    let radius = hazard.full_radius as i64;
    dx * dx + dy * dy < radius * radius
}

/// Scores every hazard completed this tick against every player.
///
/// Nothing is awarded once the game timer has run out. Returns the number of
/// awards handed out.
pub fn score_completed(
    completed: &[Hazard],
    players: &mut PlayerRegistry,
    phase: &PhaseController,
) -> usize {
    if !phase.scoring_open() {
        return 0;
    }

    let mut awards = 0;
    for hazard in completed {
        for player in players.iter_mut() {
            if is_caught(hazard, player.x, player.y) {
                player.score += hazard.award();
                awards += 1;
            }
        }
    }
    awards
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn registry_with(positions: &[(i32, i32)]) -> PlayerRegistry {
        let mut registry = PlayerRegistry::new(16);
        for (i, &(x, y)) in positions.iter().enumerate() {
            let player = registry
                .get_or_create(addr(9000 + i as u16), &format!("p{}", i), true)
                .unwrap();
            player.x = x;
            player.y = y;
        }
        registry
    }

    fn active_phase() -> PhaseController {
        let mut phase = PhaseController::new(100);
        phase.start();
        phase
    }

    fn score_of(registry: &PlayerRegistry, port: u16) -> u32 {
        registry.get(addr(port)).unwrap().score
    }

    #[test]
    fn test_is_caught_center() {
        let hazard = Hazard::new(0, 100, 100, 60);
        assert!(is_caught(&hazard, 100, 100));
    }

    #[test]
    fn test_boundary_does_not_score() {
        // 36^2 + 48^2 == 60^2
        let hazard = Hazard::new(0, 100, 100, 60);
        assert!(!is_caught(&hazard, 136, 148));
        assert!(!is_caught(&hazard, 160, 100));
    }

    #[test]
    fn test_just_inside_boundary_scores() {
        // 8^2 + 4^2 == 9^2 - 1
        let hazard = Hazard::new(0, 0, 0, 9);
        assert!(is_caught(&hazard, 8, 4));
        assert!(!is_caught(&hazard, 0, 9));
    }

    #[test]
    fn test_scenario_one_inside_one_outside() {
        let mut registry = registry_with(&[(100, 100), (400, 400)]);
        let hazard = Hazard::new(0, 110, 110, 80);

        let awards = score_completed(&[hazard], &mut registry, &active_phase());

        assert_eq!(awards, 1);
        assert_eq!(score_of(&registry, 9000), 25);
        assert_eq!(score_of(&registry, 9001), 0);
    }

    #[test]
    fn test_one_hazard_scores_many_players() {
        let mut registry = registry_with(&[(100, 100), (105, 95), (90, 110)]);
        let hazard = Hazard::new(1, 100, 100, 150);

        let awards = score_completed(&[hazard], &mut registry, &active_phase());

        assert_eq!(awards, 3);
        for port in 9000..9003 {
            assert_eq!(score_of(&registry, port), 16);
        }
    }

    #[test]
    fn test_one_player_scores_many_hazards() {
        let mut registry = registry_with(&[(100, 100)]);
        let completed = vec![
            Hazard::new(0, 100, 100, 60),
            Hazard::new(4, 120, 120, 300),
            Hazard::new(2, 900, 400, 160),
        ];

        score_completed(&completed, &mut registry, &active_phase());

        assert_eq!(score_of(&registry, 9000), 25 + 1);
    }

    #[test]
    fn test_no_score_after_round_ends() {
        let mut registry = registry_with(&[(100, 100)]);
        let mut phase = PhaseController::new(1);
        phase.start();
        phase.advance();

        let awards = score_completed(&[Hazard::new(0, 100, 100, 60)], &mut registry, &phase);

        assert_eq!(awards, 0);
        assert_eq!(score_of(&registry, 9000), 0);
    }

    #[test]
    fn test_scores_on_final_tick() {
        let mut registry = registry_with(&[(100, 100)]);
        let mut phase = PhaseController::new(1);
        phase.start();

        score_completed(&[Hazard::new(0, 100, 100, 60)], &mut registry, &phase);
        phase.advance();

        assert_eq!(score_of(&registry, 9000), 25);
    }

    #[test]
    fn test_far_coordinates_do_not_overflow() {
        let hazard = Hazard::new(4, i32::MAX - 10, 0, 499);
        assert!(!is_caught(&hazard, -(i32::MAX - 10), 0));
    }
}
