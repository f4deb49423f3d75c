//! Collision primitives and narrow-phase tests
//!
//! Geometry lives here; the broad phase over the static world is in
//! [`crate::spatial`].
//!
//! # Key Types
//!
//! - [`Triangle`] - a static world surface triangle
//! - [`Sphere`], [`Capsule`] - moving query primitives
//! - [`Contact`] - separation normal plus penetration depth
//! - [`Aabb`] - bounding volume used for broad-phase pruning

pub mod primitives;

pub use primitives::{closest_point_on_segment, Aabb, Capsule, Contact, Sphere, Triangle};
