use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use kyx_core::tuning::TuningOverrides;
use kyx_platformer::config::PlatformerConfig;
use kyx_runner::{SessionBroadcast, SessionCommand, SessionConfig, spawn_session};

/// Frames between periodic status lines (10 s at 60 Hz).
const STATUS_EVERY_TICKS: u64 = 600;

/// Load the platformer config and layer any tuning from the JSON game config
/// named by `KYX_GAME_CONFIG`.
fn load_config() -> PlatformerConfig {
    let config = PlatformerConfig::load();
    let Ok(path) = std::env::var("KYX_GAME_CONFIG") else {
        return config;
    };
    let tuning = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| TuningOverrides::from_game_config_json(&json).map_err(|e| e.to_string()));
    match tuning {
        Ok(tuning) => {
            tracing::info!(?tuning, "Loaded tuning from {path}");
            config.with_tuning(&tuning)
        },
        Err(e) => {
            tracing::warn!("Failed to load tuning from {path}: {e}, using defaults");
            config
        },
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("KYX runner starting");

    let (cmd_tx, mut broadcast_rx, handle) = spawn_session(SessionConfig::new(load_config()));
    let (stop_tx, mut stop_rx) = mpsc::unbounded_channel::<()>();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(());
        }
    });

    loop {
        tokio::select! {
            msg = broadcast_rx.recv() => match msg {
                Some(SessionBroadcast::Frame { tick, snapshot, .. }) => {
                    if tick % STATUS_EVERY_TICKS == 0 {
                        tracing::info!(
                            tick,
                            room = snapshot.room_index,
                            health = snapshot.player.health,
                            enemies = snapshot.enemies.len(),
                            "Status"
                        );
                    }
                },
                Some(SessionBroadcast::GameOver { tick }) => {
                    tracing::info!(tick, "Game over");
                },
                Some(SessionBroadcast::Ended) | None => break,
            },
            Some(()) = stop_rx.recv() => {
                tracing::info!("Shutdown requested");
                let _ = cmd_tx.send(SessionCommand::Stop);
            }
        }
    }

    let _ = handle.await;
}
