use crate::game::{ClientSync, LocalPlayer, Scene};
use crate::input::HeldKeys;
use log::{debug, error, info, warn};
use shared::{CLIENT_TICK_RATE, MAX_SNAPSHOT_BYTES};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tokio::sync::watch;
use tokio::time::{interval, timeout_at, Instant, MissedTickBehavior};

/// Network tick task: sends the local player's frame and publishes the reply
pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    sync: ClientSync,
    keys: HeldKeys,
    scenes: watch::Sender<Option<Scene>>,
    tick_duration: Duration,
}

impl Client {
    pub async fn new(
        server: &str,
        player: LocalPlayer,
        keys: HeldKeys,
        scenes: watch::Sender<Option<Scene>>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let server_addr = lookup_host(server)
            .await?
            .next()
            .ok_or_else(|| format!("could not resolve {}", server))?;

        let bind_addr = if server_addr.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr).await?;
        info!(
            "Playing as '{}' against {} from {}",
            player.name,
            server_addr,
            socket.local_addr()?
        );

        Ok(Client {
            socket,
            server_addr,
            sync: ClientSync::new(player),
            keys,
            scenes,
            tick_duration: Duration::from_secs_f64(1.0 / CLIENT_TICK_RATE as f64),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn sync(&self) -> &ClientSync {
        &self.sync
    }

    /// One local tick: move, send, and wait at most one tick for the reply.
    ///
    /// Returns `Ok(false)` once the render side has gone away.
    pub async fn tick(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
        if !self.keys.drain() || self.scenes.is_closed() {
            return Ok(false);
        }

        let data = self.sync.outbound(self.keys.held())?;
        self.socket.send_to(&data, self.server_addr).await?;

        let deadline = Instant::now() + self.tick_duration;
        let mut buffer = [0u8; MAX_SNAPSHOT_BYTES];
        loop {
            let (len, from) = match timeout_at(deadline, self.socket.recv_from(&mut buffer)).await
            {
                Ok(result) => result?,
                Err(_) => {
                    debug!("No snapshot within {:?}", self.tick_duration);
                    return Ok(true);
                }
            };

            if from != self.server_addr {
                debug!("Ignoring {} bytes from {}", len, from);
                continue;
            }

            let scene = self.sync.receive(&buffer[..len])?.clone();
            return Ok(self.scenes.send(Some(scene)).is_ok());
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut ticker = interval(self.tick_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match self.tick().await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    if e.is::<shared::CodecError>() {
                        warn!("Discarded snapshot: {}", e);
                    } else {
                        error!("Network error: {}", e);
                    }
                }
            }
        }

        info!(
            "Window closed after {} snapshots, stopping network task",
            self.sync.received()
        );
        Ok(())
    }
}
