// Use cases layer: the simulation loop and its collaborators.

pub mod game;
pub mod players;
pub mod support;
pub mod tracker;

pub use game::Game;
pub use players::{Activity, Player, PlayerDecisions, PlayerRepository};
pub use support::{Clock, RandomSource, SeededRandom, SystemClock, SystemRandom};
pub use tracker::{DiffTracker, StateTracker, TickDiff};
