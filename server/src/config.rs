//! Game parameters for the authoritative server
//!
//! Defaults reproduce the classic game: 100 ticks per second, a ten second
//! countdown and a fifteen second round. Any field can be overridden from a
//! JSON file, and the command line overrides both. The arena size is part of
//! the protocol and lives in `shared`, since clients clamp against it too.

use serde::{Deserialize, Serialize};
use shared::{
    ARENA_HEIGHT, ARENA_WIDTH, MAX_NAME_BYTES, MAX_SNAPSHOT_BYTES, SERVER_TICK_RATE,
};
use std::path::Path;
use std::time::Duration;

use crate::hazards::MIN_RESPAWN_TICKS;

pub const MAX_TICK_RATE: u32 = 1000;
/// Upper bound for both `countdown_secs` and `game_secs`
pub const MAX_PHASE_SECS: u32 = 3600;

/// Number of snapshot groups, each closed by one group separator
const SNAPSHOT_GROUPS: usize = 4;

fn decimal_width(value: u64) -> usize {
    value.to_string().len()
}

/// Largest encoded size of one player entry in a snapshot.
///
/// Name, x, y, three color channels and score, each followed by a field
/// separator. Positions are clamped to the arena by the server.
pub fn max_player_entry_bytes() -> usize {
    MAX_NAME_BYTES
        + decimal_width(ARENA_WIDTH as u64)
        + decimal_width(ARENA_HEIGHT as u64)
        + 3 * decimal_width(u8::MAX as u64)
        + decimal_width(u32::MAX as u64)
        + 7
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation ticks per second; also the soft pacing target of the loop
    pub tick_rate: u32,
    /// Seconds before the first hazard spawns and the round starts
    pub countdown_secs: u32,
    /// Length of the round once it has started
    pub game_secs: u32,
    /// Registration cap; keeps the player group of a snapshot bounded
    pub max_players: usize,
    /// Fixed RNG seed for reproducible hazard sequences
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: SERVER_TICK_RATE,
            countdown_secs: 10,
            game_secs: 15,
            max_players: 16,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Loads a config from a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Respawn delays are drawn from [MIN_RESPAWN_TICKS, tick_rate / 3)
        let min_tick_rate = (MIN_RESPAWN_TICKS as u32 + 1) * 3;
        if self.tick_rate < min_tick_rate || self.tick_rate > MAX_TICK_RATE {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be within {}..={}, got {}",
                min_tick_rate, MAX_TICK_RATE, self.tick_rate
            )));
        }
        if !(1..=MAX_PHASE_SECS).contains(&self.countdown_secs) {
            return Err(ConfigError::Invalid(format!(
                "countdown_secs must be within 1..={}, got {}",
                MAX_PHASE_SECS, self.countdown_secs
            )));
        }
        if !(1..=MAX_PHASE_SECS).contains(&self.game_secs) {
            return Err(ConfigError::Invalid(format!(
                "game_secs must be within 1..={}, got {}",
                MAX_PHASE_SECS, self.game_secs
            )));
        }
        if self.max_players == 0 {
            return Err(ConfigError::Invalid("max_players must be at least 1".into()));
        }
        let needed = self.max_player_snapshot_bytes();
        if needed > MAX_SNAPSHOT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "max_players {} can need {} snapshot bytes, limit is {}",
                self.max_players, needed, MAX_SNAPSHOT_BYTES
            )));
        }
        Ok(())
    }

    /// Ticks before the round starts, saturating at `i32::MAX`
    pub fn countdown_ticks(&self) -> i32 {
        i32::try_from(self.countdown_secs.saturating_mul(self.tick_rate)).unwrap_or(i32::MAX)
    }

    /// Ticks in a round, saturating at `u32::MAX`
    pub fn game_ticks(&self) -> u32 {
        self.game_secs.saturating_mul(self.tick_rate)
    }

    /// Worst-case snapshot size with every player slot taken and no hazards.
    ///
    /// At most one of the countdown and timer texts is present, and neither
    /// is ever longer than its starting value.
    pub fn max_player_snapshot_bytes(&self) -> usize {
        let longest_clock = (self.countdown_ticks() as i64).max(self.game_ticks() as i64);
        let display = self.format_seconds(longest_clock).len() + 1;
        self.max_players
            .saturating_mul(max_player_entry_bytes())
            .saturating_add(SNAPSHOT_GROUPS + display)
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate as f64)
    }

    /// Formats a tick count as seconds with two decimals, e.g. `"9.99"`
    pub fn format_seconds(&self, ticks: i64) -> String {
        format!("{:.2}", ticks as f64 / self.tick_rate as f64)
    }
}
