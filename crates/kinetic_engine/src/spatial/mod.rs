//! Spatial partitioning for the static world
//!
//! The [`TriangleOctree`] is the broad phase over the world mesh: built
//! once from a finalized triangle set, then queried read-only by the
//! physics integrator every substep.

pub mod octree;

pub use octree::{OctreeConfig, TriangleOctree};
