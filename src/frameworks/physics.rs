//! Reference physics provider: forward-Euler integration, world-bounds
//! clamping and a naive O(n²) overlap scan. Good enough to run the core
//! end-to-end; a production engine replaces it behind [`PhysicsProvider`].

use std::collections::BTreeMap;

use crate::domain::physics::{Body, BodyId, Contact, PhysicsProvider};

pub struct CirclePhysics {
    bodies: BTreeMap<BodyId, Body>,
    next_id: u64,
    size: f32,
    /// Seconds integrated per step; the tick duration.
    dt: f32,
}

impl CirclePhysics {
    pub fn new(dt: f32) -> Self {
        Self {
            bodies: BTreeMap::new(),
            next_id: 0,
            size: 0.0,
            dt,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl PhysicsProvider for CirclePhysics {
    fn start(&mut self, size: f32) {
        self.size = size;
    }

    fn stop(&mut self) {
        self.bodies.clear();
    }

    fn step(&mut self) -> Vec<Contact> {
        let limit = self.size;
        for body in self.bodies.values_mut() {
            if body.is_static() {
                continue;
            }
            body.position += body.velocity * self.dt;
            body.position = body.position.clamp(
                glam::Vec2::splat(-limit),
                glam::Vec2::splat(limit),
            );
        }

        // Report a contact when the larger circle covers the smaller one's
        // center; the game decides what, if anything, the overlap means.
        let ids: Vec<BodyId> = self.bodies.keys().copied().collect();
        let mut contacts = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let (first, second) = (&self.bodies[&a], &self.bodies[&b]);
                let distance = first.position.distance(second.position);
                if distance < first.radius.max(second.radius) as f32 {
                    contacts.push(Contact { a, b });
                }
            }
        }
        contacts
    }

    fn create_body(&mut self, radius: u32, mass: f32, is_static: bool) -> BodyId {
        self.next_id += 1;
        let id = BodyId(self.next_id);
        let mut body = Body::new(radius, mass, is_static);
        body.set_ready(true);
        self.bodies.insert(id, body);
        id
    }

    fn destroy_body(&mut self, id: BodyId) {
        self.bodies.remove(&id);
    }

    fn make_body_static(&mut self, id: BodyId) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.set_static(true);
        }
    }

    fn make_body_dynamic(&mut self, id: BodyId) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.set_static(false);
        }
    }

    fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn step_integrates_and_clamps() {
        let mut physics = CirclePhysics::new(1.0);
        physics.start(10.0);
        let id = physics.create_body(10, 1.0, false);
        let body = physics.body_mut(id).unwrap();
        body.position = Vec2::new(9.0, 0.0);
        body.velocity = Vec2::new(5.0, 0.0);

        physics.step();
        assert_eq!(physics.body(id).unwrap().position, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn static_bodies_do_not_move() {
        let mut physics = CirclePhysics::new(1.0);
        physics.start(10.0);
        let id = physics.create_body(10, 1.0, true);
        physics.body_mut(id).unwrap().velocity = Vec2::new(5.0, 0.0);

        physics.step();
        assert_eq!(physics.body(id).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn covered_center_reports_contact() {
        let mut physics = CirclePhysics::new(1.0);
        physics.start(100.0);
        let big = physics.create_body(30, 9.0, false);
        let small = physics.create_body(10, 1.0, true);
        physics.body_mut(small).unwrap().position = Vec2::new(20.0, 0.0);

        let contacts = physics.step();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].a, big);
        assert_eq!(contacts[0].b, small);

        // Too far apart: no contact.
        physics.body_mut(small).unwrap().position = Vec2::new(40.0, 0.0);
        assert!(physics.step().is_empty());
    }
}
