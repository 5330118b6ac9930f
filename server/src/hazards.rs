//! Growing circular hazards and the spawner that owns them
//!
//! A hazard starts with a radius of one and grows by a fixed step every tick
//! until it reaches its full radius. The tick it gets there it is removed from
//! the arena and handed back to the caller exactly once, so scoring can run on
//! it. Hazards never grow on the tick they spawn.

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use shared::{HazardView, Rgb, ARENA_HEIGHT, ARENA_WIDTH};

use crate::config::GameConfig;

pub const DIFFICULTY_LEVELS: usize = 5;

/// Lower bound of the random delay between two spawns, in ticks
pub const MIN_RESPAWN_TICKS: i32 = 5;

/// Size, speed and reward settings of one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty {
    pub min_radius: i32,
    pub max_radius: i32,
    /// Radius gained per tick
    pub growth: i32,
    /// Score given to every player caught inside on completion
    pub award: u32,
    pub color: Rgb,
}

/// Harder hazards are larger and faster but cost less when they catch you.
pub const DIFFICULTIES: [Difficulty; DIFFICULTY_LEVELS] = [
    Difficulty {
        min_radius: 50,
        max_radius: 100,
        growth: 1,
        award: 25,
        color: Rgb::new(248, 131, 121),
    },
    Difficulty {
        min_radius: 100,
        max_radius: 200,
        growth: 2,
        award: 16,
        color: Rgb::new(236, 88, 0),
    },
    Difficulty {
        min_radius: 150,
        max_radius: 300,
        growth: 4,
        award: 9,
        color: Rgb::new(255, 49, 49),
    },
    Difficulty {
        min_radius: 200,
        max_radius: 400,
        growth: 8,
        award: 4,
        color: Rgb::new(196, 30, 58),
    },
    Difficulty {
        min_radius: 250,
        max_radius: 500,
        growth: 16,
        award: 1,
        color: Rgb::new(112, 41, 99),
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hazard {
    pub level: usize,
    pub x: i32,
    pub y: i32,
    pub full_radius: i32,
    pub current_radius: i32,
}

impl Hazard {
    /// Creates a hazard at the given spot; out of range levels use the hardest one.
    pub fn new(level: usize, x: i32, y: i32, full_radius: i32) -> Self {
        Self {
            level: level.min(DIFFICULTY_LEVELS - 1),
            x,
            y,
            full_radius,
            current_radius: 1,
        }
    }

    /// Picks a uniform difficulty, arena position and full radius
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: i32, height: i32) -> Self {
        let level = rng.gen_range(0..DIFFICULTY_LEVELS);
        let difficulty = &DIFFICULTIES[level];
        let full_radius = rng.gen_range(difficulty.min_radius..difficulty.max_radius);
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        Self::new(level, x, y, full_radius)
    }

    pub fn difficulty(&self) -> &'static Difficulty {
        &DIFFICULTIES[self.level]
    }

    pub fn award(&self) -> u32 {
        self.difficulty().award
    }

    pub fn grow(&mut self) {
        self.current_radius += self.difficulty().growth;
    }

    pub fn is_done(&self) -> bool {
        self.current_radius >= self.full_radius
    }

    /// Ticks of growth left before completion
    pub fn remaining_ticks(&self) -> i32 {
        let growth = self.difficulty().growth;
        let missing = (self.full_radius - self.current_radius).max(0);
        (missing + growth - 1) / growth
    }

    pub fn view(&self) -> HazardView {
        HazardView {
            x: self.x,
            y: self.y,
            full_radius: self.full_radius,
            current_radius: self.current_radius,
            color: self.difficulty().color,
        }
    }
}

/// Outcome of one spawner tick
#[derive(Debug, Default)]
pub struct SpawnerTick {
    /// Hazards that finished growing this tick and left the arena
    pub completed: Vec<Hazard>,
    /// True when a new hazard entered the arena this tick
    pub spawned: bool,
}

/// Owns the live hazard set and the spawn cadence
pub struct HazardSpawner {
    hazards: Vec<Hazard>,
    /// Ticks until the next spawn
    spawn_wait: i32,
    /// Exclusive upper bound of the random respawn delay
    respawn_limit: i32,
    rng: StdRng,
}

impl HazardSpawner {
    pub fn new(config: &GameConfig, rng: StdRng) -> Self {
        Self {
            hazards: Vec::new(),
            spawn_wait: config.countdown_ticks(),
            respawn_limit: (config.tick_rate as i32 / 3).max(MIN_RESPAWN_TICKS + 1),
            rng,
        }
    }

    /// Grows and retires live hazards, then counts down to the next spawn.
    pub fn tick(&mut self) -> SpawnerTick {
        for hazard in &mut self.hazards {
            hazard.grow();
        }
        let (completed, live): (Vec<Hazard>, Vec<Hazard>) =
            self.hazards.drain(..).partition(Hazard::is_done);
        self.hazards = live;

        self.spawn_wait -= 1;
        let spawned = self.spawn_wait <= 0;
        if spawned {
            let hazard = Hazard::random(&mut self.rng, ARENA_WIDTH, ARENA_HEIGHT);
            debug!(
                "Spawned level {} hazard at ({}, {}) with radius {}",
                hazard.level, hazard.x, hazard.y, hazard.full_radius
            );
            self.hazards.push(hazard);
            self.spawn_wait = self.rng.gen_range(MIN_RESPAWN_TICKS..self.respawn_limit);
        }

        SpawnerTick { completed, spawned }
    }

    /// Places a hazard directly into the arena
    pub fn insert(&mut self, hazard: Hazard) {
        self.hazards.push(hazard);
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn spawn_wait(&self) -> i32 {
        self.spawn_wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn quiet_spawner() -> HazardSpawner {
        let config = GameConfig {
            countdown_secs: 1000,
            ..GameConfig::default()
        };
        HazardSpawner::new(&config, StdRng::seed_from_u64(1))
    }

    /// Ticks until the given hazard is reported completed
    fn ticks_to_complete(hazard: Hazard) -> usize {
        let mut spawner = quiet_spawner();
        spawner.insert(hazard);
        for tick in 1..=1000 {
            let result = spawner.tick();
            if !result.completed.is_empty() {
                assert_eq!(result.completed.len(), 1);
                assert!(spawner.hazards().is_empty());
                return tick;
            }
        }
        panic!("Hazard never completed");
    }

    #[test]
    fn test_hazard_creation() {
        let hazard = Hazard::new(2, 100, 200, 180);
        assert_eq!(hazard.level, 2);
        assert_eq!(hazard.current_radius, 1);
        assert_eq!(hazard.award(), 9);
        assert!(!hazard.is_done());
    }

    #[test]
    fn test_hazard_level_is_capped() {
        let hazard = Hazard::new(42, 0, 0, 300);
        assert_eq!(hazard.level, DIFFICULTY_LEVELS - 1);
    }

    #[test]
    fn test_awards_shrink_with_difficulty() {
        for pair in DIFFICULTIES.windows(2) {
            assert!(pair[0].award > pair[1].award);
            assert!(pair[0].growth < pair[1].growth);
        }
    }

    #[test]
    fn test_completion_tick_slow_hazard() {
        // ceil((100 - 1) / 1) = 99
        assert_eq!(ticks_to_complete(Hazard::new(0, 10, 10, 100)), 99);
    }

    #[test]
    fn test_completion_tick_fast_hazard() {
        // ceil((150 - 1) / 4) = 38
        assert_eq!(ticks_to_complete(Hazard::new(2, 10, 10, 150)), 38);
        // ceil((257 - 1) / 16) = 16
        assert_eq!(ticks_to_complete(Hazard::new(4, 10, 10, 257)), 16);
    }

    #[test]
    fn test_completed_hazard_reported_once() {
        let mut spawner = quiet_spawner();
        spawner.insert(Hazard::new(4, 0, 0, 17));

        assert_eq!(spawner.tick().completed.len(), 1);
        for _ in 0..10 {
            assert!(spawner.tick().completed.is_empty());
        }
    }

    #[test]
    fn test_remaining_ticks() {
        let mut hazard = Hazard::new(1, 0, 0, 10);
        assert_eq!(hazard.remaining_ticks(), 5);
        hazard.grow();
        assert_eq!(hazard.remaining_ticks(), 4);
    }

    #[test]
    fn test_random_hazard_within_ranges() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let hazard = Hazard::random(&mut rng, 1000, 500);
            let difficulty = hazard.difficulty();
            assert!((0..1000).contains(&hazard.x));
            assert!((0..500).contains(&hazard.y));
            assert!(hazard.full_radius >= difficulty.min_radius);
            assert!(hazard.full_radius < difficulty.max_radius);
        }
    }

    #[test]
    fn test_first_spawn_after_countdown() {
        let config = GameConfig {
            countdown_secs: 1,
            ..GameConfig::default()
        };
        let mut spawner = HazardSpawner::new(&config, StdRng::seed_from_u64(3));
        let wait = config.countdown_ticks();

        for _ in 1..wait {
            assert!(!spawner.tick().spawned);
        }
        assert!(spawner.tick().spawned);
        assert_eq!(spawner.hazards().len(), 1);
    }

    #[test]
    fn test_respawn_delay_range() {
        let config = GameConfig {
            countdown_secs: 1,
            ..GameConfig::default()
        };
        let mut spawner = HazardSpawner::new(&config, StdRng::seed_from_u64(5));
        let limit = (config.tick_rate / 3) as i32;

        let mut spawns = 0;
        for _ in 0..5000 {
            if spawner.tick().spawned {
                spawns += 1;
                assert!(spawner.spawn_wait() >= MIN_RESPAWN_TICKS);
                assert!(spawner.spawn_wait() < limit);
            }
        }
        assert!(spawns > 100);
    }

    #[test]
    fn test_new_hazard_does_not_grow_on_spawn_tick() {
        let config = GameConfig {
            countdown_secs: 1,
            ..GameConfig::default()
        };
        let mut spawner = HazardSpawner::new(&config, StdRng::seed_from_u64(8));
        while !spawner.tick().spawned {}

        assert_eq!(spawner.hazards()[0].current_radius, 1);
    }
}
