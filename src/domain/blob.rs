//! The blob entity: a dual-state object whose attributes are authored either
//! by game logic or by the physics engine, reconciled once per tick.
//!
//! Each mirrored attribute lives in a [`Tracked`] cell carrying a dirty flag
//! meaning "game logic wrote this since the last sync". At sync time a dirty
//! value is pushed into the physics body and the flag cleared; a clean value
//! is pulled from the body. Whichever side wrote last wins, and nothing is
//! applied twice.

use glam::Vec2;
use tracing::debug;

use crate::domain::physics::{BodyId, PhysicsProvider};
use crate::domain::tuning::GameSettings;

/// Collection-scoped blob identity, allocated by the owning [`Game`].
///
/// [`Game`]: crate::use_cases::game::Game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobId(pub u64);

/// Identifies the player that owns or controls a blob.
pub type PlayerId = u64;

/// Derives the display/collision radius from mass.
///
/// Radius is never set independently by game logic; every mass write
/// recomputes it through this law.
pub fn mass_to_radius(mass: f32) -> u32 {
    (100.0 * mass).sqrt().ceil() as u32
}

/// One mirrored attribute: the in-memory value plus an override flag.
#[derive(Debug, Clone, Copy)]
pub struct Tracked<T> {
    value: T,
    dirty: bool,
}

impl<T: Copy> Tracked<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// Game-logic write: records the value and marks it for push.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.dirty = true;
    }

    /// Physics-side pull: overwrites the value without marking it dirty.
    pub fn adopt(&mut self, value: T) {
        self.value = value;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear(&mut self) {
        self.dirty = false;
    }
}

/// Closed set of blob variants. Variant-specific behavior hangs off the kind
/// in [`Blob::update`] and [`Blob::on_collision`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlobKind {
    /// A player-owned mass fragment. `controlled` fragments receive steering
    /// from player decisions; others (freshly popped pieces, for instance)
    /// drift on their own.
    Player {
        owner: PlayerId,
        controlled: bool,
    },
    /// A food pellet. Pinned in place: its body is static.
    Food,
    /// Mass ejected by a player. Still owned (and re-eatable) by anyone,
    /// but never steered.
    Ejected { owner: PlayerId },
}

/// A simulated circular entity and the shadow state of its physics body.
#[derive(Debug)]
pub struct Blob {
    id: BlobId,
    kind: BlobKind,
    radius: Tracked<u32>,
    position: Tracked<Vec2>,
    velocity: Tracked<Vec2>,
    mass: Tracked<f32>,
    is_static: bool,
    body: Option<BodyId>,
    created: bool,
}

impl Blob {
    /// Builds a blob not yet attached to any physics body. Food is static
    /// from birth; everything else is dynamic.
    pub fn new(kind: BlobKind, position: Vec2, mass: f32) -> Self {
        let mut blob = Self {
            id: BlobId(0),
            kind,
            radius: Tracked::new(mass_to_radius(mass)),
            position: Tracked::new(Vec2::ZERO),
            velocity: Tracked::new(Vec2::ZERO),
            mass: Tracked::new(mass),
            is_static: matches!(kind, BlobKind::Food),
            body: None,
            created: false,
        };
        // Written through the tracked setters so the values survive the
        // forced sync at body-attach time.
        blob.set_position(position);
        blob.set_mass(mass);
        blob
    }

    pub(crate) fn assign_id(&mut self, id: BlobId) {
        self.id = id;
    }

    pub fn id(&self) -> BlobId {
        self.id
    }

    pub fn kind(&self) -> BlobKind {
        self.kind
    }

    pub fn owner(&self) -> Option<PlayerId> {
        match self.kind {
            BlobKind::Player { owner, .. } | BlobKind::Ejected { owner } => Some(owner),
            BlobKind::Food => None,
        }
    }

    /// True for fragments that player steering applies to.
    pub fn is_controlled(&self) -> bool {
        matches!(
            self.kind,
            BlobKind::Player {
                controlled: true,
                ..
            }
        )
    }

    pub fn is_food(&self) -> bool {
        matches!(self.kind, BlobKind::Food)
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn body_id(&self) -> Option<BodyId> {
        self.body
    }

    /// A blob is ready once it has a body and the provider reports that body
    /// initialized. Blobs that are not ready are excluded from every external
    /// listing.
    pub fn is_ready(&self, physics: &dyn PhysicsProvider) -> bool {
        self.created
            && self
                .body
                .and_then(|id| physics.body(id))
                .is_some_and(|b| b.is_ready())
    }

    pub fn radius(&self) -> u32 {
        self.radius.get()
    }

    pub fn position(&self) -> Vec2 {
        self.position.get()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity.get()
    }

    pub fn mass(&self) -> f32 {
        self.mass.get()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position.set(position);
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity.set(velocity);
    }

    /// Writes mass and recomputes the derived radius; both are marked for
    /// push.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass.set(mass);
        self.radius.set(mass_to_radius(mass));
    }

    /// Explicit radius override, decoupled from mass. Rarely wanted; mass
    /// writes normally own the radius.
    pub fn set_radius(&mut self, radius: u32) {
        self.radius.set(radius);
    }

    /// Allocates and attaches a physics body. Idempotent: a second call is
    /// silently absorbed.
    pub fn on_create(&mut self, physics: &mut dyn PhysicsProvider) {
        if self.created {
            return;
        }
        let body = physics.create_body(self.radius.get(), self.mass.get(), self.is_static);
        self.body = Some(body);
        self.created = true;
        // Force the fresh body to adopt the blob's pre-creation values
        // instead of provider defaults.
        self.sync_with_physics(physics, true);
    }

    /// Detaches and destroys the physics body. Idempotent. The blob keeps its
    /// last-known values but no longer participates in simulation.
    pub fn on_remove(&mut self, physics: &mut dyn PhysicsProvider) {
        if !self.created {
            return;
        }
        if let Some(body) = self.body.take() {
            physics.destroy_body(body);
        }
        self.created = false;
    }

    /// Reconciles blob state with the physics body.
    ///
    /// For each mirrored attribute: push the in-memory value when its
    /// override flag is set (or `override_all` is given) and clear the flag,
    /// otherwise pull the body's value. Static bodies never move and never
    /// change mass, so velocity and mass are left untouched for them.
    pub fn sync_with_physics(&mut self, physics: &mut dyn PhysicsProvider, override_all: bool) {
        let Some(id) = self.body else {
            return;
        };
        let Some(body) = physics.body_mut(id) else {
            return;
        };

        if self.radius.is_dirty() || override_all {
            body.radius = self.radius.get();
            self.radius.clear();
        } else {
            self.radius.adopt(body.radius);
        }

        if self.position.is_dirty() || override_all {
            body.position = self.position.get();
            self.position.clear();
        } else {
            self.position.adopt(body.position);
        }

        if body.is_static() {
            return;
        }

        if self.velocity.is_dirty() || override_all {
            body.velocity = self.velocity.get();
            self.velocity.clear();
        } else {
            self.velocity.adopt(body.velocity);
        }

        if self.mass.is_dirty() || override_all {
            body.mass = self.mass.get();
            self.mass.clear();
        } else {
            self.mass.adopt(body.mass);
        }
    }

    /// Per-tick behavior: velocity decay, so blobs asymptotically slow down
    /// without a friction force in the physics engine.
    pub fn update(&mut self, settings: &GameSettings) {
        if self.is_static {
            return;
        }
        let decayed = self.velocity.get() * settings.velocity_decay;
        self.velocity.set(decayed);
    }

    /// Collision hook. Returns true when this blob consumed `other`, which
    /// tells the caller to remove the consumed side.
    pub fn on_collision(&mut self, other: &mut Blob, settings: &GameSettings) -> bool {
        match self.kind {
            // Food and ejected mass never consume anything.
            BlobKind::Food | BlobKind::Ejected { .. } => false,
            BlobKind::Player { owner, .. } => {
                // A player fragment never consumes its own fragments here;
                // merging is a mode concern.
                if matches!(other.kind, BlobKind::Player { owner: o, .. } if o == owner) {
                    return false;
                }
                if self.mass.get() < other.mass.get() * settings.eat_mass_ratio {
                    return false;
                }
                let gained = other.mass.get();
                self.set_mass(self.mass.get() + gained);
                debug!(
                    eater = self.id.0,
                    eaten = other.id.0,
                    gained,
                    new_mass = self.mass.get(),
                    "blob consumed"
                );
                true
            }
        }
    }

    /// Pins the blob in place; the body, if any, is reclassified. Used for
    /// transient effects such as briefly freezing ejected mass.
    pub fn make_static(&mut self, physics: &mut dyn PhysicsProvider) {
        self.is_static = true;
        if let Some(id) = self.body {
            physics.make_body_static(id);
        }
    }

    pub fn make_dynamic(&mut self, physics: &mut dyn PhysicsProvider) {
        self.is_static = false;
        if let Some(id) = self.body {
            physics.make_body_dynamic(id);
        }
    }
}
