//! # Circle Dodge Server
//!
//! Authoritative server for a small multiplayer dodging game. Players steer a
//! token around a rectangular arena while circular hazards appear and grow to
//! their full size; a hazard that finishes growing charges every player inside
//! it. The player with the lowest score at the end of the round wins.
//!
//! ## Game Flow
//!
//! A game moves through three phases:
//! - **Countdown**: any endpoint that sends an input frame joins as a player
//! - **Active**: starts when the first hazard spawns; the game timer runs
//! - **Ended**: the timer has expired and scores are frozen
//!
//! Endpoints that arrive after the countdown are refused as players but still
//! receive snapshots, so they can watch.
//!
//! ## Tick Model
//!
//! The server is reactive. Each tick waits for one datagram, applies it,
//! advances the simulation by one step and replies to that sender only. The
//! game clock therefore advances with incoming traffic rather than wall time,
//! and a short sleep after each tick caps the pace at the configured rate.
//!
//! ## Module Organization
//!
//! - `config`: game parameters, JSON loading and validation
//! - `hazards`: difficulty table, hazard growth and the spawner
//! - `phase`: the Countdown/Active/Ended state machine and game timer
//! - `player_registry`: players keyed by endpoint, in registration order
//! - `scoring`: containment test and award rules
//! - `game`: one authoritative game tying the above together
//! - `network`: the UDP receive/step/reply loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::GameConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new("0.0.0.0:8080", GameConfig::default()).await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod game;
pub mod hazards;
pub mod network;
pub mod phase;
pub mod player_registry;
pub mod scoring;
