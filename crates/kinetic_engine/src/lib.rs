//! # Kinetic Engine
//!
//! A first-person playground physics core. The crate consumes a finalized
//! set of world-space triangles, indexes them in a static octree, and
//! advances a capsule-shaped player plus a fixed pool of spherical bodies
//! with a fixed-substep integrator.
//!
//! ## Features
//!
//! - **Geometry Primitives**: closest-point and intersection routines for
//!   segments, triangles, spheres, and capsules
//! - **Static Spatial Index**: a read-only triangle octree answering
//!   capsule/sphere contact queries
//! - **Fixed-Substep Integrator**: gravity, exponential damping, impulse
//!   exchange, positional correction, and out-of-bounds recovery
//! - **Launch Interface**: round-robin body spawning and a charge-based
//!   throw model
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kinetic_engine::prelude::*;
//!
//! fn main() {
//!     let floor = Triangle::new(
//!         Vec3::new(-50.0, 0.0, -50.0),
//!         Vec3::new(50.0, 0.0, -50.0),
//!         Vec3::new(0.0, 0.0, 50.0),
//!     );
//!     let mut world = SimulationWorld::new(vec![floor], SimulationConfig::default());
//!
//!     let input = FrameInput {
//!         direction: Vec3::new(0.0, 0.0, -1.0),
//!         jump: false,
//!     };
//!     world.step(1.0 / 60.0, &input);
//!
//!     for pose in world.body_poses() {
//!         println!("body at {:?}", pose.center);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod collision;
pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        collision::{Aabb, Capsule, Contact, Sphere, Triangle},
        config::{Config, ConfigError, SimulationConfig},
        foundation::math::Vec3,
        physics::{BodyPool, DynamicBody, FrameInput, Player, SimulationWorld},
        spatial::{OctreeConfig, TriangleOctree},
    };
}
