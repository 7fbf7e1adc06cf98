use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

/// Fixed simulation cadence: one tick every 50 ms.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub const WORLD_BROADCAST_CAPACITY: usize = 128;

/// World half-extent; bodies live on `[-size, size]` per axis.
pub fn world_size() -> f32 {
    env::var("ARENA_WORLD_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000.0)
}

pub fn turn_minutes() -> u64 {
    env::var("ARENA_TURN_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5)
}

/// Food population the demo sandbox mode keeps topped up.
pub fn food_target() -> usize {
    env::var("ARENA_FOOD_TARGET")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(200)
}
