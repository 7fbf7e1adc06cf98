// Gameplay tuning. Runtime/server knobs live in `frameworks::config`.

use std::time::Duration;

/// Tunable simulation settings, readable and writable between turns.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Per-tick velocity multiplier; blobs coast to a stop without any
    /// friction force in the physics engine.
    pub velocity_decay: f32,
    /// Wall-clock length of one turn; the world resets when it elapses.
    pub turn_duration: Duration,
    /// A blob must be this many times heavier than another to consume it.
    pub eat_mass_ratio: f32,
    /// Mass of a newly joined player blob.
    pub player_start_mass: f32,
    /// Mass of one food pellet.
    pub food_mass: f32,
    /// Minimum mass a blob needs before it may split.
    pub min_split_mass: f32,
    /// Launch speed of a freshly split fragment.
    pub split_speed: f32,
    /// Mass quantum shed by one eject.
    pub eject_mass: f32,
    /// Minimum mass a blob needs before it may eject.
    pub min_eject_mass: f32,
    /// Launch speed of ejected mass.
    pub eject_speed: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            velocity_decay: 0.95,
            turn_duration: Duration::from_secs(5 * 60),
            eat_mass_ratio: 1.25,
            player_start_mass: 10.0,
            food_mass: 1.0,
            min_split_mass: 36.0,
            split_speed: 800.0,
            eject_mass: 14.0,
            min_eject_mass: 32.0,
            eject_speed: 600.0,
        }
    }
}

impl GameSettings {
    pub fn set_turn_minutes(&mut self, minutes: u64) {
        self.turn_duration = Duration::from_secs(minutes * 60);
    }
}
