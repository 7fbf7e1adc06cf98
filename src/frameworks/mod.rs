// Frameworks layer: runtime glue around the simulation core.

pub mod config;
pub mod physics;
pub mod runner;
pub mod sandbox;

pub use physics::CirclePhysics;
pub use runner::{init_runtime, run_game, world_update_serializer};
pub use sandbox::SandboxMode;
