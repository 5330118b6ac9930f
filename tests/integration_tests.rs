//! Integration tests for the client, server and wire protocol
//!
//! These tests run a real server on a loopback UDP socket and talk to it
//! either with raw sockets or with the client's network task.

use server::config::GameConfig;
use server::network::Server;
use shared::{
    decode_snapshot, encode_input, InputFrame, Rgb, Snapshot, MAX_SNAPSHOT_BYTES,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

const REPLY_TIMEOUT: Duration = Duration::from_secs(1);

fn quick_config() -> GameConfig {
    GameConfig {
        countdown_secs: 1,
        game_secs: 1,
        seed: Some(11),
        ..GameConfig::default()
    }
}

/// Binds a server on an ephemeral port and runs it in the background
async fn start_server(config: GameConfig) -> SocketAddr {
    let mut server = Server::new("127.0.0.1:0", config)
        .await
        .expect("Failed to bind server");
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.run().await });
    addr
}

async fn bind_socket() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind client socket")
}

fn frame(name: &str, x: i32, y: i32) -> InputFrame {
    InputFrame {
        name: name.to_string(),
        x,
        y,
        color: Rgb::new(30, 144, 255),
    }
}

/// Sends one input frame and waits for the snapshot sent back
async fn exchange(socket: &UdpSocket, server: SocketAddr, input: &InputFrame) -> Snapshot {
    socket
        .send_to(&encode_input(input).unwrap(), server)
        .await
        .unwrap();

    let mut buffer = [0u8; MAX_SNAPSHOT_BYTES];
    let (len, from) = timeout(REPLY_TIMEOUT, socket.recv_from(&mut buffer))
        .await
        .expect("No reply from server")
        .unwrap();
    assert_eq!(from, server);
    decode_snapshot(&buffer[..len]).expect("Server sent an undecodable snapshot")
}

/// SERVER PROTOCOL TESTS
mod protocol_tests {
    use super::*;
    use server::phase::GamePhase;

    /// A fresh server waits in the countdown with nobody registered
    #[test]
    fn server_starts_in_countdown() {
        let server = tokio_test::block_on(Server::new("127.0.0.1:0", quick_config()))
            .expect("Failed to bind server");

        let game = server.game();
        assert_eq!(game.phase.phase(), GamePhase::Countdown);
        assert!(game.players.is_empty());
        assert_eq!(game.tick, 0);
    }

    /// The first packet from a new endpoint registers it and is answered
    #[tokio::test]
    async fn registration_reply() {
        let server = start_server(quick_config()).await;
        let socket = bind_socket().await;

        let snapshot = exchange(&socket, server, &frame("alice", 120, 80)).await;

        assert_eq!(snapshot.players.len(), 1);
        let player = &snapshot.players[0];
        assert_eq!(player.name, "alice");
        assert_eq!((player.x, player.y), (120, 80));
        assert_eq!(player.color, Rgb::new(30, 144, 255));
        assert_eq!(player.score, 0);
        assert!(snapshot.countdown.is_some());
        assert!(snapshot.timer.is_none());
    }

    /// Players are listed in the order they joined
    #[tokio::test]
    async fn players_listed_in_join_order() {
        let server = start_server(quick_config()).await;
        let first = bind_socket().await;
        let second = bind_socket().await;

        exchange(&first, server, &frame("carol", 10, 10)).await;
        exchange(&second, server, &frame("alice", 20, 20)).await;
        let snapshot = exchange(&first, server, &frame("carol", 30, 30)).await;

        let names: Vec<&str> = snapshot.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["carol", "alice"]);
        assert_eq!(snapshot.players[0].x, 30);
    }

    /// Garbage gets no reply and does not take the server down
    #[tokio::test]
    async fn malformed_packet_is_ignored() {
        let server = start_server(quick_config()).await;
        let socket = bind_socket().await;

        socket.send_to(b"\xff\xfe\x1f12\x1f", server).await.unwrap();

        let mut buffer = [0u8; MAX_SNAPSHOT_BYTES];
        let silent = timeout(Duration::from_millis(200), socket.recv_from(&mut buffer)).await;
        assert!(silent.is_err(), "Server replied to a malformed packet");

        let snapshot = exchange(&socket, server, &frame("bob", 1, 1)).await;
        assert_eq!(snapshot.players.len(), 1);
    }

    /// Out of range positions are pulled back into the arena
    #[tokio::test]
    async fn position_clamped_by_server() {
        let server = start_server(quick_config()).await;
        let socket = bind_socket().await;

        let snapshot = exchange(&socket, server, &frame("eve", -400, 90_000)).await;

        assert_eq!((snapshot.players[0].x, snapshot.players[0].y), (0, 500));
    }
}

/// GAME FLOW TESTS
mod game_flow_tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use client::game::{rank_standings, Scene, ScenePhase};

    /// Keeps one player sending until the snapshot matches `done`
    async fn play_until(
        socket: &UdpSocket,
        server: SocketAddr,
        name: &str,
        done: impl Fn(&Snapshot) -> bool,
    ) -> Snapshot {
        for _ in 0..5_000 {
            let snapshot = exchange(socket, server, &frame(name, 500, 250)).await;
            if done(&snapshot) {
                return snapshot;
            }
        }
        panic!("Game never reached the expected state");
    }

    /// Endpoints arriving after the countdown only spectate
    #[tokio::test]
    async fn late_joiner_spectates() {
        let server = start_server(quick_config()).await;
        let player = bind_socket().await;
        let spectator = bind_socket().await;

        play_until(&player, server, "alice", |s| s.countdown.is_none()).await;

        let snapshot = exchange(&spectator, server, &frame("late", 10, 10)).await;
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.players[0].name, "alice");
    }

    /// Countdown, round and final standings as seen by a client
    #[tokio::test]
    async fn full_game_reaches_final_standings() {
        let server = start_server(quick_config()).await;
        let alice = bind_socket().await;
        let bob = bind_socket().await;

        let first = exchange(&alice, server, &frame("alice", 500, 250)).await;
        exchange(&bob, server, &frame("bob", 990, 490)).await;
        let countdown = Scene::from(first);
        assert_eq!(countdown.phase(), ScenePhase::Countdown);
        assert_approx_eq!(countdown.countdown_seconds().unwrap(), 0.99, 0.005);

        let running = play_until(&alice, server, "alice", |s| s.timer.is_some()).await;
        assert_eq!(Scene::from(running).phase(), ScenePhase::Running);

        let finished = play_until(&alice, server, "alice", |s| {
            s.countdown.is_none() && s.timer.is_none()
        })
        .await;
        let scene = Scene::from(finished.clone());
        assert_eq!(scene.phase(), ScenePhase::Finished);

        let standings = rank_standings(&finished.players);
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].rank, 1);
        assert!(standings[0].score <= standings[1].score);

        // Scores are frozen once the round is over
        let later = exchange(&alice, server, &frame("alice", 500, 250)).await;
        let scores = |s: &Snapshot| s.players.iter().map(|p| p.score).collect::<Vec<_>>();
        assert_eq!(scores(&later), scores(&finished));
    }
}

/// CLIENT NETWORK TASK TESTS
mod client_tests {
    use super::*;
    use client::game::LocalPlayer;
    use client::input::{key_channel, Direction};
    use client::network::Client;
    use std::collections::HashSet;
    use tokio::sync::watch;

    /// Held keys move the token and the server's reply reaches the watch channel
    #[tokio::test]
    async fn client_moves_and_publishes_scene() {
        let server = start_server(quick_config()).await;
        let (mut capture, keys) = key_channel();
        let (scene_tx, mut scene_rx) = watch::channel(None);
        let player = LocalPlayer::new("dana", Rgb::new(1, 2, 3));

        let mut client = Client::new(&server.to_string(), player, keys, scene_tx)
            .await
            .unwrap();

        let held: HashSet<Direction> = [Direction::Right].into_iter().collect();
        capture.report(&held);

        let mut published = None;
        for _ in 0..50 {
            assert!(client.tick().await.unwrap());
            if scene_rx.has_changed().unwrap() {
                published = scene_rx.borrow_and_update().clone();
                break;
            }
        }

        let scene = published.expect("Client never received a snapshot");
        let me = scene
            .players
            .iter()
            .find(|p| p.name == "dana")
            .expect("Client not registered");
        assert!(me.x > 500);
        assert_eq!(me.y, 250);
    }

    /// A client with nothing on the other end keeps ticking
    #[tokio::test]
    async fn client_survives_silent_server() {
        let silent = bind_socket().await;
        let (_capture, keys) = key_channel();
        let (scene_tx, scene_rx) = watch::channel(None);

        let mut client = Client::new(
            &silent.local_addr().unwrap().to_string(),
            LocalPlayer::new("zed", Rgb::default()),
            keys,
            scene_tx,
        )
        .await
        .unwrap();

        for _ in 0..3 {
            assert!(client.tick().await.unwrap());
        }
        assert!(scene_rx.borrow().is_none());
        assert_eq!(client.sync().received(), 0);
    }

    /// The task stops once the render side drops its receiver
    #[tokio::test]
    async fn client_stops_without_renderer() {
        let server = start_server(quick_config()).await;
        let (_capture, keys) = key_channel();
        let (scene_tx, scene_rx) = watch::channel(None);
        drop(scene_rx);

        let mut client = Client::new(
            &server.to_string(),
            LocalPlayer::new("gone", Rgb::default()),
            keys,
            scene_tx,
        )
        .await
        .unwrap();

        assert!(!client.tick().await.unwrap());
    }
}
