//! Player repository: the registered participants, their pending decisions
//! and their tick-boundary signalling.
//!
//! The network layer (out of scope here) writes decisions and join requests;
//! the game loop consumes them once per tick. The repository mutex is always
//! taken before the blob collection lock when both are needed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec2;
use tokio::sync::Notify;
use tracing::info;

use crate::domain::blob::{BlobId, PlayerId};
use crate::error::GameError;

/// What a player asked for this tick. Applied exactly once, then cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    None,
    Split,
    Eject,
}

impl TryFrom<u8> for Activity {
    type Error = GameError;

    /// Wire-value parse. Anything outside the known set is a fatal
    /// input-validation failure at the boundary.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Split),
            2 => Ok(Self::Eject),
            other => Err(GameError::InvalidActivity(other)),
        }
    }
}

/// Pending input for one player.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerDecisions {
    /// Desired movement; its length doubles as the requested speed.
    pub velocity: Vec2,
    pub activity: Activity,
}

/// One registered participant.
#[derive(Debug)]
pub struct Player {
    pub name: String,
    /// Set when the player asked to (re)spawn; cleared once applied.
    pub join: bool,
    /// Cleared when the session disconnects; the repository drops the
    /// player at the next tick boundary.
    pub connected: bool,
    /// Blob ids currently owned by this player.
    pub blobs: Vec<BlobId>,
    pub decisions: PlayerDecisions,
    tick_signal: Arc<Notify>,
}

impl Player {
    fn new(name: String) -> Self {
        Self {
            name,
            join: false,
            connected: true,
            blobs: Vec::new(),
            decisions: PlayerDecisions::default(),
            tick_signal: Arc::new(Notify::new()),
        }
    }

    /// Handle observers wait on to be released at tick boundaries.
    pub fn tick_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.tick_signal)
    }

    /// Releases every waiter blocked on this player's tick boundary.
    pub fn signal_tick(&self) {
        self.tick_signal.notify_waiters();
    }

    /// Drops blob ownership and pending input; used when the world resets.
    pub fn clear(&mut self) {
        self.blobs.clear();
        self.join = false;
        self.decisions = PlayerDecisions::default();
    }
}

/// Registry of all known players, keyed by id.
#[derive(Default)]
pub struct PlayerRepository {
    players: Mutex<HashMap<PlayerId, Player>>,
    next_id: AtomicU64,
}

impl PlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn register(&self, name: impl Into<String>) -> PlayerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let name = name.into();
        info!(player_id = id, player = %name, "player registered");
        self.lock().insert(id, Player::new(name));
        id
    }

    /// Direct access for the game loop. Callers must respect the
    /// repository-before-collection lock order.
    pub fn lock(&self) -> MutexGuard<'_, HashMap<PlayerId, Player>> {
        self.players.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flags a pending (re)spawn request.
    pub fn request_join(&self, id: PlayerId) {
        if let Some(player) = self.lock().get_mut(&id) {
            player.join = true;
        }
    }

    /// Stores the player's input for the next tick.
    pub fn set_decisions(&self, id: PlayerId, decisions: PlayerDecisions) {
        if let Some(player) = self.lock().get_mut(&id) {
            player.decisions = decisions;
        }
    }

    /// Marks the player's session gone; the loop drops it at the next tick.
    pub fn disconnect(&self, id: PlayerId) {
        if let Some(player) = self.lock().get_mut(&id) {
            player.connected = false;
        }
    }

    pub fn tick_signal(&self, id: PlayerId) -> Option<Arc<Notify>> {
        self.lock().get(&id).map(Player::tick_signal)
    }

    /// Broadcasts a tick boundary to every player. Never blocks on consumers.
    pub fn signal_tick_all(&self) {
        for player in self.lock().values() {
            player.signal_tick();
        }
    }

    /// Clears blob ownership and pending input for everyone; part of `stop`.
    pub fn clear_all(&self) {
        for player in self.lock().values_mut() {
            player.clear();
        }
    }

    /// Drops disconnected players and returns the blob ids they still owned
    /// so the caller can purge them from the world.
    pub fn remove_unregistered_and_dead(&self) -> Vec<BlobId> {
        let mut players = self.lock();
        let mut orphaned = Vec::new();
        players.retain(|id, player| {
            if player.connected {
                return true;
            }
            info!(player_id = *id, player = %player.name, "player removed");
            orphaned.extend(player.blobs.drain(..));
            false
        });
        orphaned
    }
}
