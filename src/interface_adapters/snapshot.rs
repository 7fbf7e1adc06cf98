// Read model for external consumers (network layer, observers). Snapshots
// are taken under the collection lock and contain ready blobs only.

use serde::{Deserialize, Serialize};

use crate::domain::blob::{Blob, BlobKind, PlayerId};

/// Serializable blob variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlobKindTag {
    Player { owner: PlayerId, controlled: bool },
    Food,
    Ejected { owner: PlayerId },
}

impl From<BlobKind> for BlobKindTag {
    fn from(kind: BlobKind) -> Self {
        match kind {
            BlobKind::Player { owner, controlled } => Self::Player { owner, controlled },
            BlobKind::Food => Self::Food,
            BlobKind::Ejected { owner } => Self::Ejected { owner },
        }
    }
}

/// One blob as externally visible this tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobSnapshot {
    pub id: u64,
    #[serde(flatten)]
    pub kind: BlobKindTag,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: u32,
    pub mass: f32,
}

impl From<&Blob> for BlobSnapshot {
    fn from(blob: &Blob) -> Self {
        let position = blob.position();
        let velocity = blob.velocity();
        Self {
            id: blob.id().0,
            kind: blob.kind().into(),
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
            radius: blob.radius(),
            mass: blob.mass(),
        }
    }
}

/// Full world state broadcast after each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldUpdate {
    pub tick: u64,
    pub blobs: Vec<BlobSnapshot>,
}
