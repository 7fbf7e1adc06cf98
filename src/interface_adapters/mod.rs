// Interface adapters: read models exposed to external consumers.

pub mod snapshot;

pub use snapshot::{BlobKindTag, BlobSnapshot, WorldUpdate};
