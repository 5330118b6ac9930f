//! Server network layer: one blocking receive, one simulation step, one reply
//!
//! Every tick waits for a single datagram, feeds it to the game, advances the
//! simulation and answers the sender alone with a full snapshot. Clients only
//! hear from the server in response to their own packets, and with several
//! clients sending at once only one of them is served per tick.

use crate::config::GameConfig;
use crate::game::{GameState, InputOutcome, StepReport};
use log::{debug, error, info, warn};
use shared::{decode_input, CodecError, MAX_INPUT_BYTES};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::sleep;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
    #[error("discarded packet from {addr}: {source}")]
    Protocol { addr: SocketAddr, source: CodecError },
    #[error("snapshot for {addr} not sent: {source}")]
    Snapshot { addr: SocketAddr, source: CodecError },
}

/// Result of one served datagram
#[derive(Debug, Clone, Copy)]
pub struct TickOutcome {
    pub addr: SocketAddr,
    pub input: InputOutcome,
    pub step: StepReport,
    pub bytes_sent: usize,
}

/// Authoritative game server bound to one UDP socket
pub struct Server {
    socket: UdpSocket,
    game: GameState,
    tick_duration: Duration,
}

impl Server {
    pub async fn new(addr: &str, config: GameConfig) -> Result<Self, ServerError> {
        let socket = UdpSocket::bind(addr).await?;
        info!("Server listening on {}", socket.local_addr()?);

        Ok(Server {
            socket,
            tick_duration: config.tick_duration(),
            game: GameState::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Serves exactly one datagram.
    ///
    /// Waits without timeout for the next packet. Undecodable packets are
    /// rejected before they touch the game, so they neither advance the
    /// simulation nor get a reply.
    pub async fn tick(&mut self) -> Result<TickOutcome, ServerError> {
        let mut buffer = [0u8; MAX_INPUT_BYTES];
        let (len, addr) = self.socket.recv_from(&mut buffer).await?;

        let frame = decode_input(&buffer[..len])
            .map_err(|source| ServerError::Protocol { addr, source })?;

        let input = self.game.apply_input(addr, &frame);
        let step = self.game.step();

        let data = self
            .game
            .encode_snapshot()
            .map_err(|source| ServerError::Snapshot { addr, source })?;
        let bytes_sent = self.socket.send_to(&data, addr).await?;

        Ok(TickOutcome {
            addr,
            input,
            step,
            bytes_sent,
        })
    }

    /// Main server loop; runs until the process exits
    pub async fn run(&mut self) {
        info!(
            "Server started: {} ticks/s, {}s countdown, {}s rounds",
            self.game.config.tick_rate, self.game.config.countdown_secs, self.game.config.game_secs
        );

        loop {
            match self.tick().await {
                Ok(outcome) => {
                    if self.game.tick % 100 == 0 {
                        debug!(
                            "Tick {}: {} players, {} hazards, served {} ({} bytes)",
                            self.game.tick,
                            self.game.players.len(),
                            self.game.spawner.hazards().len(),
                            outcome.addr,
                            outcome.bytes_sent
                        );
                    }
                }
                Err(e @ ServerError::Protocol { .. }) => warn!("{}", e),
                Err(e) => error!("{}", e),
            }

            sleep(self.tick_duration).await;
        }
    }
}
