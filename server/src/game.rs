use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{encode_snapshot, CodecError, InputFrame, Snapshot, ARENA_HEIGHT, ARENA_WIDTH};
use std::net::SocketAddr;

use crate::config::GameConfig;
use crate::hazards::{Hazard, HazardSpawner};
use crate::phase::{GamePhase, PhaseController};
use crate::player_registry::PlayerRegistry;
use crate::scoring::score_completed;

/// What happened to one inbound input frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// A known player's position and color were updated
    Updated,
    /// The sender became a new player
    Registered,
    /// The sender is not a player and may not become one now
    Refused,
}

/// Summary of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub completed: usize,
    pub awards: usize,
    pub spawned: bool,
    pub started: bool,
    pub ended: bool,
}

/// Authoritative game state advanced once per received datagram
pub struct GameState {
    pub config: GameConfig,
    pub tick: u64,
    pub players: PlayerRegistry,
    pub spawner: HazardSpawner,
    pub phase: PhaseController,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            tick: 0,
            players: PlayerRegistry::new(config.max_players),
            spawner: HazardSpawner::new(&config, rng),
            phase: PhaseController::new(config.game_ticks()),
            config,
        }
    }

    /// Routes an input frame to its player, registering the sender if allowed.
    pub fn apply_input(&mut self, addr: SocketAddr, frame: &InputFrame) -> InputOutcome {
        let x = frame.x.clamp(0, ARENA_WIDTH);
        let y = frame.y.clamp(0, ARENA_HEIGHT);

        if self.players.update(addr, x, y, frame.color) {
            return InputOutcome::Updated;
        }

        let open = self.phase.registration_open();
        if self.players.get_or_create(addr, &frame.name, open).is_some() {
            self.players.update(addr, x, y, frame.color);
            return InputOutcome::Registered;
        }

        if open {
            warn!(
                "Refusing {}: player limit of {} reached",
                addr, self.config.max_players
            );
        } else {
            debug!("Refusing {}: game already started", addr);
        }
        InputOutcome::Refused
    }

    /// Advances hazards, scoring and the phase by one tick.
    pub fn step(&mut self) -> StepReport {
        // The timer only runs on ticks that began with the round in progress
        let was_active = self.phase.is_active();

        let spawner_tick = self.spawner.tick();
        let started = spawner_tick.spawned && self.phase.start();
        let awards = score_completed(&spawner_tick.completed, &mut self.players, &self.phase);
        let ended = was_active && self.phase.advance();

        self.tick += 1;

        if ended {
            self.log_standings();
        }

        StepReport {
            completed: spawner_tick.completed.len(),
            awards,
            spawned: spawner_tick.spawned,
            started,
            ended,
        }
    }

    /// Builds the full snapshot of the current state
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_with(self.spawner.hazards().iter())
    }

    fn snapshot_with<'a>(&self, hazards: impl Iterator<Item = &'a Hazard>) -> Snapshot {
        let countdown = (self.phase.phase() == GamePhase::Countdown)
            .then(|| self.config.format_seconds(self.spawner.spawn_wait() as i64));
        let timer = (self.phase.is_active() && self.phase.game_timer() > 0)
            .then(|| self.config.format_seconds(self.phase.game_timer() as i64));

        Snapshot {
            players: self.players.snapshot(),
            hazards: hazards.map(Hazard::view).collect(),
            countdown,
            timer,
        }
    }

    /// Encodes the snapshot, leaving out hazards until it fits.
    ///
    /// Hazards with the most growing left to do are dropped first. Fails only
    /// when the frame is too large even without any hazards.
    pub fn encode_snapshot(&self) -> Result<Vec<u8>, CodecError> {
        let mut hazards: Vec<&Hazard> = self.spawner.hazards().iter().collect();
        let mut dropped = 0;

        loop {
            let snapshot = self.snapshot_with(hazards.iter().copied());
            match encode_snapshot(&snapshot) {
                Ok(bytes) => {
                    if dropped > 0 {
                        warn!(
                            "Snapshot over capacity, left out {} of {} hazards",
                            dropped,
                            self.spawner.hazards().len()
                        );
                    }
                    return Ok(bytes);
                }
                Err(CodecError::CapacityExceeded { .. }) if !hazards.is_empty() => {
                    let slowest = hazards
                        .iter()
                        .enumerate()
                        .max_by_key(|(_, hazard)| hazard.remaining_ticks())
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    hazards.remove(slowest);
                    dropped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Players sorted by ascending score; lowest score wins
    pub fn standings(&self) -> Vec<(String, u32)> {
        let mut standings: Vec<(String, u32)> = self
            .players
            .iter()
            .map(|player| (player.name.clone(), player.score))
            .collect();
        standings.sort_by_key(|(_, score)| *score);
        standings
    }

    fn log_standings(&self) {
        info!("Final standings after {} ticks:", self.tick);
        let mut rank = 0;
        let mut previous = None;
        for (name, score) in self.standings() {
            if previous != Some(score) {
                rank += 1;
                previous = Some(score);
            }
            info!("  #{} {} ({})", rank, name, score);
        }
    }
}
