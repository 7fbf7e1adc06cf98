// Physics provider contract: the simulation core owns blobs, the provider
// owns bodies, and the two only meet through this interface.

use glam::Vec2;

/// Opaque handle to a physics body. Allocated by the provider, stored on the
/// owning blob, meaningless to anyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// Mutable dynamics state of one body, as exposed to game logic.
///
/// `radius`, `position`, `velocity` and `mass` are writable through the sync
/// path; `is_static` and `is_ready` are provider-owned and read-only to game
/// logic.
#[derive(Debug, Clone)]
pub struct Body {
    pub radius: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    is_static: bool,
    is_ready: bool,
}

impl Body {
    pub fn new(radius: u32, mass: f32, is_static: bool) -> Self {
        Self {
            radius,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mass,
            is_static,
            is_ready: false,
        }
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    /// Providers call this once the body is fully initialized in their world.
    pub fn set_ready(&mut self, ready: bool) {
        self.is_ready = ready;
    }

    /// Providers call this when reclassifying a body.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }
}

/// An overlap reported by a physics step. Participants are identified by
/// their body handles; the game maps them back onto blobs.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
}

/// External physics engine boundary.
///
/// `step` integrates one tick and reports the contacts it resolved. The game
/// loop guarantees it is never called while the blob collection lock is held,
/// so providers are free to run for as long as a step takes.
pub trait PhysicsProvider: Send {
    fn start(&mut self, size: f32);
    fn stop(&mut self);

    /// Advance the simulation one fixed tick and report overlapping bodies.
    fn step(&mut self) -> Vec<Contact>;

    fn create_body(&mut self, radius: u32, mass: f32, is_static: bool) -> BodyId;
    fn destroy_body(&mut self, id: BodyId);

    fn make_body_static(&mut self, id: BodyId);
    fn make_body_dynamic(&mut self, id: BodyId);

    fn body(&self, id: BodyId) -> Option<&Body>;
    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body>;
}
