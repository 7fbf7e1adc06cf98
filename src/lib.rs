pub mod domain;
pub mod error;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{Blob, BlobId, BlobKind, GameMode, GameSettings, PhysicsProvider};
pub use error::GameError;
pub use interface_adapters::{BlobSnapshot, WorldUpdate};
pub use use_cases::{Game, PlayerRepository};
