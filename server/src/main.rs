use clap::Parser;
use log::info;
use server::config::GameConfig;
use server::network::Server;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Tick rate (simulation steps per second)
    #[arg(short, long)]
    tick_rate: Option<u32>,

    /// JSON file with game parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the hazard generator
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            GameConfig::from_file(path)?
        }
        None => GameConfig::default(),
    };
    if let Some(tick_rate) = args.tick_rate {
        config.tick_rate = tick_rate;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let address = format!("{}:{}", args.host, args.port);
    let mut server = Server::new(&address, config).await?;

    server.run().await;

    Ok(())
}
