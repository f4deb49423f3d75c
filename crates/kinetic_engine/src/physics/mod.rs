//! Physics module: dynamic bodies, player state, and the integrator
//!
//! The simulation is single-threaded and frame-driven: the caller runs a
//! fixed number of substeps synchronously per frame, and every substep
//! resolves contacts against the static [`crate::spatial::TriangleOctree`]
//! and between moving entities.

pub mod body;
pub mod player;
pub mod world;

pub use body::{BodyPool, DynamicBody};
pub use player::Player;
pub use world::{BodyPose, FrameInput, SimulationWorld};
