use std::sync::Arc;

use tokio::sync::{Notify, broadcast, watch};

use blob_arena::frameworks::{self, CirclePhysics, SandboxMode, config};
use blob_arena::interface_adapters::snapshot::WorldUpdate;
use blob_arena::use_cases::support::{SystemClock, SystemRandom};
use blob_arena::use_cases::tracker::DiffTracker;
use blob_arena::use_cases::{Game, PlayerRepository};
use blob_arena::GameSettings;

#[tokio::main]
async fn main() {
    frameworks::init_runtime();

    let mut settings = GameSettings::default();
    settings.set_turn_minutes(config::turn_minutes());

    let game = Arc::new(Game::new(
        Box::new(CirclePhysics::new(config::TICK_INTERVAL.as_secs_f32())),
        Arc::new(PlayerRepository::new()),
        Arc::new(DiffTracker::new()),
        Arc::new(SystemClock),
        Box::new(SystemRandom::new()),
        settings,
    ));

    let mode = SandboxMode::new(config::food_target());
    if let Err(error) = game.start(config::world_size(), Box::new(mode)) {
        tracing::error!(%error, "failed to start game");
        return;
    }

    // World updates are broadcast to whoever serves them to clients. A single
    // serializer task turns each update into JSON once for all subscribers.
    let (world_tx, world_rx) =
        broadcast::channel::<WorldUpdate>(config::WORLD_BROADCAST_CAPACITY);
    let (bytes_tx, _bytes_rx) =
        broadcast::channel::<String>(config::WORLD_BROADCAST_CAPACITY);
    let (latest_tx, _latest_rx) = watch::channel(String::new());
    let shutdown = Arc::new(Notify::new());

    tokio::spawn(frameworks::world_update_serializer(
        world_rx, bytes_tx, latest_tx,
    ));
    let runner = tokio::spawn(frameworks::run_game(
        Arc::clone(&game),
        world_tx,
        config::TICK_INTERVAL,
        Arc::clone(&shutdown),
    ));

    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
    shutdown.notify_waiters();
    let _ = runner.await;
}
