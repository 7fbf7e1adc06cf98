//! Demo game mode: keeps the food population topped up and supplies a
//! standard inverse-square mass/speed curve. Real rule sets live outside
//! this crate and plug into the same [`GameMode`] seam.

use tracing::debug;

use crate::domain::blob::{Blob, BlobKind};
use crate::domain::mode::GameMode;
use crate::interface_adapters::snapshot::BlobKindTag;
use crate::use_cases::game::Game;

pub struct SandboxMode {
    food_target: usize,
    /// Speed of a start-mass blob; heavier blobs scale down from here.
    base_speed: f32,
}

impl SandboxMode {
    pub fn new(food_target: usize) -> Self {
        Self {
            food_target,
            base_speed: 300.0,
        }
    }

    fn top_up_food(&self, game: &Game) {
        let food_mass = game.settings().food_mass;
        let current = game
            .blobs()
            .iter()
            .filter(|b| matches!(b.kind, BlobKindTag::Food))
            .count();
        if current >= self.food_target {
            return;
        }
        for _ in current..self.food_target {
            let position = game.random_position();
            game.add_blob(Blob::new(BlobKind::Food, position, food_mass));
        }
        debug!(spawned = self.food_target - current, "food replenished");
    }
}

impl GameMode for SandboxMode {
    fn on_start(&mut self, game: &Game) {
        self.top_up_food(game);
    }

    fn on_finish(&mut self, _game: &Game) {}

    fn on_update(&mut self, game: &Game) {
        self.top_up_food(game);
    }

    fn max_speed_for_mass(&self, mass: f32) -> f32 {
        self.base_speed / mass.max(1.0).sqrt()
    }
}
