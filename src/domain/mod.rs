// Domain layer: core simulation types and rules.

pub mod blob;
pub mod mode;
pub mod physics;
pub mod tuning;

pub use blob::{Blob, BlobId, BlobKind, PlayerId, Tracked, mass_to_radius};
pub use mode::GameMode;
pub use physics::{Body, BodyId, Contact, PhysicsProvider};
pub use tuning::GameSettings;
