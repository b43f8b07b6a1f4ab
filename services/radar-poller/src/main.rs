//! Meteorad radar poller.
//!
//! Downloads the radar captures on a fixed interval and maintains the tiles
//! and the tile manifest used by the viewer. Subcommands rebuild tiles from
//! stored captures and produce reference tiles and animations.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use radar_poller::commands;
use radar_poller::{AppConfig, HttpFetcher, LocalClock, Poller, TokioSleep};
use radar_tiles::animation::AnimationSettings;
use tokio::sync::watch;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "radar-poller")]
#[command(about = "Meteorad radar capture poller and tile builder")]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "RADAR_CONFIG")]
    config: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the feeds until interrupted (default)
    Poll {
        /// Stop after this many cycles
        #[arg(long)]
        max_cycles: Option<u64>,
    },
    /// Build tiles from stored captures of one feed
    Tiles {
        #[arg(long)]
        feed: String,
        /// First capture filename to include
        #[arg(long)]
        start: Option<String>,
        /// Last capture filename to include
        #[arg(long)]
        stop: Option<String>,
    },
    /// Rewrite the tile manifest
    Manifest,
    /// Write a reference tile for one category of a capture
    Reference {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        category: String,
        #[arg(long)]
        output: PathBuf,
    },
    /// Write a fade-in GIF highlighting one category of a capture
    Animate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        category: String,
        #[arg(long)]
        output: PathBuf,
        /// Clip length in seconds
        #[arg(long, default_value = "3")]
        duration: f32,
        #[arg(long, default_value = "5")]
        fps: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env may set RADAR_CONFIG and the path overrides
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::resolve(args.config.as_deref())?;

    match args.command.unwrap_or(Command::Poll { max_cycles: None }) {
        Command::Poll { max_cycles } => poll(config, max_cycles).await?,
        Command::Tiles { feed, start, stop } => {
            let report = tokio::task::spawn_blocking(move || {
                commands::tile_feed(&config, &feed, start.as_deref(), stop.as_deref())
            })
            .await??;
            if !report.is_clean() {
                warn!(failed = report.failed_count(), "Some captures could not be tiled");
            }
        }
        Command::Manifest => {
            let entries = commands::refresh_manifest(&config)?;
            info!(entries, "Manifest refreshed");
        }
        Command::Reference {
            input,
            category,
            output,
        } => commands::reference(&config.pipeline, &input, &category, &output)?,
        Command::Animate {
            input,
            category,
            output,
            duration,
            fps,
        } => {
            let settings = AnimationSettings { duration, fps };
            let path = commands::animate(&config.pipeline, &input, &category, &output, settings)?;
            info!(path = %path.display(), "Wrote animation");
        }
    }

    Ok(())
}

async fn poll(config: AppConfig, max_cycles: Option<u64>) -> Result<()> {
    info!("Starting meteorad poller");

    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let poller = Poller::new(config, fetcher, TokioSleep, LocalClock);

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Handle Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        shutdown_tx.send(true).ok();
    });

    let cycles = poller.run(shutdown_rx, max_cycles).await;
    info!(cycles, "Poller stopped");

    Ok(())
}
