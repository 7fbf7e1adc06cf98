// Framework bootstrap and the fixed-tick driver for the simulation loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, broadcast, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::interface_adapters::snapshot::WorldUpdate;
use crate::use_cases::game::Game;

pub fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Drives `Game::update` at the fixed tick cadence until shutdown, pushing a
/// ready-only world snapshot to subscribers after every tick. The broadcast
/// is lossy toward slow consumers and never blocks the loop.
pub async fn run_game(
    game: Arc<Game>,
    world_tx: broadcast::Sender<WorldUpdate>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                break;
            }
            _ = interval.tick() => {
                game.update();
                let _ = world_tx.send(WorldUpdate {
                    tick: game.tick_count(),
                    blobs: game.blobs(),
                });
            }
        }
    }

    info!(tick = game.tick_count(), "runner shutting down");
    game.stop();
}

/// Serializes each world update once and fans the JSON out to every
/// subscriber, keeping the latest frame in a watch slot for late joiners.
pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    bytes_tx: broadcast::Sender<String>,
    latest_tx: watch::Sender<String>,
) {
    loop {
        match world_rx.recv().await {
            Ok(update) => match serde_json::to_string(&update) {
                Ok(json) => {
                    let _ = bytes_tx.send(json.clone());
                    let _ = latest_tx.send(json);
                }
                Err(error) => error!(%error, "failed to serialize world update"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "serializer lagged behind the world feed");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
