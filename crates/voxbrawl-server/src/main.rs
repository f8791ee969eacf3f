mod config;
mod handler;
mod permissions;

use std::time::Duration;

use config::ServerConfig;
use handler::GameHandler;
use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};
use voxbrawl_world::flat_generator::generate_flat;
use voxbrawl_world::hills_generator::generate_hills;
use voxbrawl_world::map::VoxelMap;

fn generate_world(config: &ServerConfig) -> VoxelMap {
    match config.world.generator.to_lowercase().as_str() {
        "hills" => generate_hills(config.world.seed, config.world.ground_z),
        "flat" => generate_flat(config.world.ground_z),
        other => {
            warn!("Unknown generator '{other}', using flat");
            generate_flat(config.world.ground_z)
        }
    }
}

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load("server.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load server.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "Voxbrawl Server v{} starting: {}",
        env!("CARGO_PKG_VERSION"),
        config.server.name
    );
    info!(
        "World: generator {}, seed {}, ground z {}",
        config.world.generator, config.world.seed, config.world.ground_z
    );

    let map = generate_world(&config);
    let mut handler = GameHandler::new(&config, map);

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

    // Handle Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    // Console REPL: read lines from stdin
    let (console_tx, mut console_rx) = tokio::sync::mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut tick_interval =
        tokio::time::interval(Duration::from_millis(config.server.tick_rate_ms.max(1)));
    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                handler.game_tick();
            }
            Some(line) = console_rx.recv() => {
                if line == "stop" {
                    break;
                }
                let result = handler.handle_console_line(&line);
                for message in &result.messages {
                    if result.success {
                        info!("{message}");
                    } else {
                        warn!("{message}");
                    }
                }
                handler.flush();
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!(
        "Server shut down after {} ticks with {} players connected.",
        handler.current_tick(),
        handler.roster().len()
    );
}
