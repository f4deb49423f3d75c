//! Dynamic body pool
//!
//! A fixed-size, pre-allocated set of spherical bodies. Bodies are never
//! created or destroyed during play: not-yet-thrown bodies sit parked far
//! below the world, and spawning reactivates slots in round-robin order.
//! Overwriting the oldest active body is the intended backpressure for
//! unbounded throw requests.

use crate::collision::Sphere;
use crate::foundation::math::Vec3;

/// A spherical rigid body advanced by the integrator
#[derive(Debug, Clone, Copy)]
pub struct DynamicBody {
    /// Collision volume (center is the body's position)
    pub collider: Sphere,
    /// Current velocity
    pub velocity: Vec3,
}

/// Fixed pool of dynamic bodies with round-robin reuse
#[derive(Debug, Clone)]
pub struct BodyPool {
    bodies: Vec<DynamicBody>,
    next: usize,
}

impl BodyPool {
    /// Pre-allocate `count` bodies of the given radius, parked at
    /// `parked_y` so they collide with nothing until activated
    ///
    /// `count` must be at least 1; the launch interface has no failure
    /// mode and always expects a next slot.
    pub fn new(count: usize, radius: f32, parked_y: f32) -> Self {
        let parked = DynamicBody {
            collider: Sphere::new(Vec3::new(0.0, parked_y, 0.0), radius),
            velocity: Vec3::zeros(),
        };
        Self {
            bodies: vec![parked; count],
            next: 0,
        }
    }

    /// Activate the next body in round-robin order
    ///
    /// Sets the collider center to `origin` and the velocity to
    /// `direction * speed`, and returns the slot index for caller
    /// bookkeeping. Never fails: past the pool capacity the oldest active
    /// body is reused.
    pub fn spawn(&mut self, origin: Vec3, direction: Vec3, speed: f32) -> usize {
        let index = self.next;
        let body = &mut self.bodies[index];
        body.collider.center = origin;
        body.velocity = direction * speed;

        self.next = (self.next + 1) % self.bodies.len();
        index
    }

    /// Number of pooled bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Shared view of all body slots
    pub fn bodies(&self) -> &[DynamicBody] {
        &self.bodies
    }

    /// Mutable view of all body slots
    pub fn bodies_mut(&mut self) -> &mut [DynamicBody] {
        &mut self.bodies
    }
}
