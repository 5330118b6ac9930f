//! Player registration and per-endpoint state for the game server
//!
//! This module tracks every player that has joined the current game:
//! - Identity by network endpoint (the address each datagram arrives from)
//! - Display name fixed at registration time
//! - Latest reported position and color, plus the authoritative score
//!
//! The registry is append-only. Players are never removed, so iteration order
//! is registration order and stays stable for the whole game, which keeps the
//! player group of every snapshot in a consistent order.

use log::info;
use shared::{sanitize_name, PlayerView, Rgb};
use std::collections::HashMap;
use std::net::SocketAddr;

/// A registered player and their authoritative state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Endpoint the player sends from; used as identity and reply address
    pub addr: SocketAddr,
    /// Display name, immutable after registration
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
    /// Cumulative score; lower is better
    pub score: u32,
}

impl Player {
    /// Creates a player with the given name at the arena origin
    ///
    /// Position and color are filled in from the same packet that caused
    /// the registration, straight after creation.
    pub fn new(addr: SocketAddr, name: &str) -> Self {
        Self {
            addr,
            name: sanitize_name(name),
            x: 0,
            y: 0,
            color: Rgb::default(),
            score: 0,
        }
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            name: self.name.clone(),
            x: self.x,
            y: self.y,
            color: self.color,
            score: self.score,
        }
    }
}

/// Append-only table of players keyed by endpoint
///
/// Players are stored in registration order; a side index maps each
/// endpoint to its slot so lookups stay constant time.
pub struct PlayerRegistry {
    /// Players in registration order
    players: Vec<Player>,
    /// Endpoint to slot in `players`
    index: HashMap<SocketAddr, usize>,
    /// Maximum number of players that may register
    max_players: usize,
}

impl PlayerRegistry {
    /// Creates an empty registry that accepts up to `max_players` entries
    pub fn new(max_players: usize) -> Self {
        Self {
            players: Vec::new(),
            index: HashMap::new(),
            max_players,
        }
    }

    /// Returns the player for `addr`, registering them first if allowed
    ///
    /// A new entry is only created when `registration_open` is true and the
    /// registry is below capacity. Otherwise an unknown endpoint yields None:
    /// the sender is not a player, but may keep watching the game through
    /// the snapshots sent back to it.
    pub fn get_or_create(
        &mut self,
        addr: SocketAddr,
        name: &str,
        registration_open: bool,
    ) -> Option<&mut Player> {
        let slot = match self.index.get(&addr).copied() {
            Some(slot) => slot,
            None => {
                if !registration_open || self.players.len() >= self.max_players {
                    return None;
                }
                let player = Player::new(addr, name);
                info!("Player '{}' joined from {}", player.name, addr);
                self.players.push(player);
                self.index.insert(addr, self.players.len() - 1);
                self.players.len() - 1
            }
        };
        self.players.get_mut(slot)
    }

    /// Applies a reported position and color to an existing player
    ///
    /// Returns false, changing nothing, if the endpoint is not registered.
    pub fn update(&mut self, addr: SocketAddr, x: i32, y: i32, color: Rgb) -> bool {
        match self.get_mut(addr) {
            Some(player) => {
                player.x = x;
                player.y = y;
                player.color = color;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, addr: SocketAddr) -> bool {
        self.index.contains_key(&addr)
    }

    pub fn get(&self, addr: SocketAddr) -> Option<&Player> {
        self.index.get(&addr).map(|&slot| &self.players[slot])
    }

    pub fn get_mut(&mut self, addr: SocketAddr) -> Option<&mut Player> {
        let slot = *self.index.get(&addr)?;
        self.players.get_mut(slot)
    }

    /// Players in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Wire views of all players, in registration order
    pub fn snapshot(&self) -> Vec<PlayerView> {
        self.players.iter().map(Player::view).collect()
    }

    /// Returns the number of registered players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if nobody has registered yet
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
