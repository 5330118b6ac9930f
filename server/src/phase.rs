//! Game phase state machine and the round timer

use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first hazard; new players may still join
    Countdown,
    /// Round running, game timer counting down
    Active,
    /// Timer expired; scores are final
    Ended,
}

/// Drives Countdown -> Active -> Ended and owns the game timer.
///
/// The countdown itself is measured by the hazard spawner: the round starts
/// when the first hazard appears, not on a clock of its own.
#[derive(Debug, Clone)]
pub struct PhaseController {
    phase: GamePhase,
    /// Ticks left in the round
    game_timer: u32,
}

impl PhaseController {
    pub fn new(game_ticks: u32) -> Self {
        Self {
            phase: GamePhase::Countdown,
            game_timer: game_ticks,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn game_timer(&self) -> u32 {
        self.game_timer
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// New endpoints can only become players before the round starts
    pub fn registration_open(&self) -> bool {
        self.phase == GamePhase::Countdown
    }

    /// Scores may change until the game timer has run out
    pub fn scoring_open(&self) -> bool {
        self.phase != GamePhase::Ended && self.game_timer > 0
    }

    /// Starts the round; only has an effect during the countdown.
    ///
    /// Returns true when the phase changed.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Countdown {
            return false;
        }
        self.phase = if self.game_timer > 0 {
            GamePhase::Active
        } else {
            GamePhase::Ended
        };
        info!("Round started with {} ticks on the clock", self.game_timer);
        true
    }

    /// Counts the game timer down by one tick while the round is running.
    ///
    /// Returns true on the tick the round ends.
    pub fn advance(&mut self) -> bool {
        if self.phase != GamePhase::Active {
            return false;
        }
        self.game_timer = self.game_timer.saturating_sub(1);
        if self.game_timer == 0 {
            self.phase = GamePhase::Ended;
            info!("Round over");
            return true;
        }
        false
    }
}
