use clap::Parser;
use log::{error, info, warn};
use server::lobby_registry::{LobbyEvent, LobbyRegistry};
use server::stage_catalog::StageCatalog;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Main-method of the application.
/// Loads the board, opens the initial lobby and optionally keeps hot-reloading the board file.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Board file to serve
        #[clap(short, long, default_value = "boards/meadow.json")]
        stage: PathBuf,
        /// Number of points to log along the enemy path
        #[clap(short = 'n', long, default_value = "10")]
        samples: usize,
        /// Maximum number of concurrently open lobbies
        #[clap(long, default_value = "16")]
        max_lobbies: usize,
        /// Maximum number of players per lobby
        #[clap(long, default_value = "4")]
        max_players: usize,
        /// Re-read the board file every N seconds until Ctrl+C
        #[clap(short, long)]
        reload_interval: Option<u64>,
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let catalog = Arc::new(StageCatalog::load(&args.stage).await?);
    log_path_samples(&catalog, args.samples).await;

    let registry = Arc::new(RwLock::new(LobbyRegistry::new(
        args.max_lobbies,
        args.max_players,
    )));

    // Observer task for lobby lifecycle events
    let mut events = registry.write().await.subscribe();
    let observer_handle = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                LobbyEvent::Created { lobby_id } => info!("Observer: lobby {} created", lobby_id),
                LobbyEvent::Closed { lobby_id } => info!("Observer: lobby {} closed", lobby_id),
            }
        }
    });

    let lobby_id = registry.write().await.register(catalog.current().await)?;

    if let Some(seconds) = args.reload_interval {
        let catalog = Arc::clone(&catalog);
        let samples = args.samples;
        let reload_handle = tokio::spawn(async move {
            run_reload_loop(catalog, seconds, samples).await;
        });

        tokio::select! {
            result = reload_handle => {
                if let Err(e) = result {
                    error!("Reload task panicked: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down gracefully...");
            }
        }
    }

    // Dropping the registry closes the event channel and ends the observer task
    {
        let mut registry = registry.write().await;
        registry.close(lobby_id)?;
    }
    drop(registry);
    if let Err(e) = observer_handle.await {
        error!("Observer task panicked: {}", e);
    }

    Ok(())
}

/// Re-reads the board file on a fixed interval.
async fn run_reload_loop(catalog: Arc<StageCatalog>, seconds: u64, samples: usize) {
    let mut interval_timer = interval(Duration::from_secs(seconds.max(1)));
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Skip the first tick since it fires immediately
    interval_timer.tick().await;

    loop {
        interval_timer.tick().await;

        match catalog.reload().await {
            Ok(_) => log_path_samples(&catalog, samples).await,
            Err(e) => warn!("Stage reload failed: {}", e),
        }
    }
}

async fn log_path_samples(catalog: &StageCatalog, count: usize) {
    let stage = catalog.current().await;
    let length = stage.path_length();
    let step = if count > 1 {
        length / (count - 1) as f64
    } else {
        0.0
    };

    for (i, point) in stage.sample_path(count).into_iter().enumerate() {
        info!(
            "  length {:>8.3} -> ({:.3}, {:.3})",
            i as f64 * step,
            point.x,
            point.y
        );
    }
}
