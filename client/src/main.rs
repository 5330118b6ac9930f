use clap::Parser;
use client::game::{LocalPlayer, Scene};
use client::input::{key_channel, HeldKeys};
use client::network::Client;
use client::rendering::Renderer;
use log::{error, info};
use macroquad::prelude::*;
use macroquad::window::Conf;
use shared::{ARENA_HEIGHT, ARENA_WIDTH};
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Name shown above your token and on the leaderboard
    #[arg(short, long)]
    name: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Circle Dodge".to_owned(),
        window_width: ARENA_WIDTH,
        window_height: ARENA_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

/// Runs the network tick task on a dedicated thread with its own runtime
fn spawn_network(
    server: String,
    player: LocalPlayer,
    keys: HeldKeys,
    scenes: watch::Sender<Option<Scene>>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Failed to start network runtime: {}", e);
                return;
            }
        };

        runtime.block_on(async move {
            let mut client = match Client::new(&server, player, keys, scenes).await {
                Ok(client) => client,
                Err(e) => {
                    error!("Failed to connect to {}: {}", server, e);
                    return;
                }
            };
            if let Err(e) = client.run().await {
                error!("Network task stopped: {}", e);
            }
        });
    });
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    info!("Controls: WASD or arrow keys to move");

    let player = LocalPlayer::with_random_color(&args.name, &mut ::rand::thread_rng());
    let (mut capture, keys) = key_channel();
    let (scene_tx, scene_rx) = watch::channel(None);

    spawn_network(args.server, player, keys, scene_tx);

    let renderer = Renderer::new(ARENA_WIDTH, ARENA_HEIGHT);
    loop {
        capture.poll();
        renderer.render(scene_rx.borrow().as_ref());
        next_frame().await;
    }
}
