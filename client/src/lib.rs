//! # Circle Dodge Client
//!
//! Client for the Circle Dodge game server. The client owns its token's
//! position: every local tick it moves by the held keys, reports name,
//! position and color to the server, and shows whatever snapshot comes back.
//!
//! ## Threads
//!
//! The macroquad render loop runs on the main thread and samples the keyboard
//! once per frame. The network tick task runs on a separate thread with its
//! own tokio runtime. The two talk through channels only:
//! - key press/release events flow to the network task over a bounded
//!   `mpsc` channel
//! - decoded scenes flow back through a `watch` channel, so the renderer
//!   always draws the latest one
//!
//! There is no prediction or reconciliation. A lost snapshot is simply not
//! seen and the previous scene stays on screen.
//!
//! ## Module Organization
//!
//! ### Input Module (`input`)
//! Keyboard sampling, edge detection and the held-key set.
//!
//! ### Game Module (`game`)
//! The local player, the `Scene` decoded from each snapshot, and the
//! tie-aware leaderboard ranking.
//!
//! ### Network Module (`network`)
//! UDP send/receive at the local tick rate with a one-tick receive timeout.
//!
//! ### Rendering Module (`rendering`)
//! Hazards, players, clocks and the final standings.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::LocalPlayer;
//! use client::input::key_channel;
//! use client::network::Client;
//! use shared::Rgb;
//! use tokio::sync::watch;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (_capture, keys) = key_channel();
//! let (scene_tx, scene_rx) = watch::channel(None);
//! let player = LocalPlayer::new("alice", Rgb::new(200, 40, 40));
//!
//! let mut client = Client::new("127.0.0.1:8080", player, keys, scene_tx).await?;
//! client.tick().await?;
//!
//! if let Some(scene) = scene_rx.borrow().as_ref() {
//!     println!("{} players in game", scene.players.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
