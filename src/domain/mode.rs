// Game mode seam. Modes are injected at `Game::start` and hot-swappable
// between turns; the core never hard-codes a rule set.

use crate::use_cases::game::Game;

/// Mode-specific rules: spawning, win conditions, balance curves.
///
/// Hooks receive the owning [`Game`] and may add or remove blobs through its
/// locked API; no lock is held when a hook runs.
pub trait GameMode: Send {
    fn on_start(&mut self, game: &Game);
    fn on_finish(&mut self, game: &Game);

    /// Runs once per tick, before player decisions are applied.
    fn on_update(&mut self, game: &Game);

    /// Maximum steering speed for a fragment of the given mass. The curve is
    /// tuning owned by the mode, not by the simulation core.
    fn max_speed_for_mass(&self, mass: f32) -> f32;
}

/// Placeholder occupying the mode slot while a real mode is borrowed out for
/// a hook call, and before the first `start`.
pub(crate) struct NullMode;

impl GameMode for NullMode {
    fn on_start(&mut self, _game: &Game) {}
    fn on_finish(&mut self, _game: &Game) {}
    fn on_update(&mut self, _game: &Game) {}
    fn max_speed_for_mass(&self, _mass: f32) -> f32 {
        0.0
    }
}
