//! Configuration system
//!
//! Every tunable of the simulation lives in [`SimulationConfig`] so that
//! behavior can be loaded from a TOML or RON file instead of recompiling.

pub use serde::{Deserialize, Serialize};

use crate::spatial::OctreeConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// # Simulation Configuration
///
/// All tunables of the physics core. The defaults reproduce the playground's
/// reference behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Downward acceleration applied to falling entities
    pub gravity: f32,

    /// Fixed substeps run per frame
    pub steps_per_frame: u32,

    /// Frame deltas are clamped to this before substep division, so a hitch
    /// never produces a tunneling-sized step
    pub max_frame_delta: f32,

    /// Size of the pre-allocated dynamic body pool
    ///
    /// Spawning beyond this count reuses the oldest slot (round-robin);
    /// reuse is the designed backpressure for unbounded throw requests and
    /// keeps the O(n^2) pair loop bounded.
    pub body_count: usize,

    /// Collider radius of every dynamic body
    pub body_radius: f32,

    /// Exponential damping rate for the grounded player
    pub player_damping: f32,

    /// Fraction of player damping applied while airborne (small air
    /// resistance instead of ground friction)
    pub air_damping_scale: f32,

    /// Exponential damping rate for dynamic bodies
    pub body_damping: f32,

    /// Velocity reflection coefficient for body-vs-world contacts
    ///
    /// The reference tuning is 1.5: the normal component is removed 1.5
    /// times over, leaving a bounce at half the impact speed. Deliberately
    /// kept as a tunable rather than "corrected" to a physical restitution.
    pub world_bounce: f32,

    /// Control acceleration (per second) while grounded
    pub ground_control_speed: f32,

    /// Control acceleration (per second) while airborne
    pub air_control_speed: f32,

    /// Vertical velocity set by a grounded jump
    pub jump_speed: f32,

    /// Throw impulse for an instantaneous release
    pub throw_base_impulse: f32,

    /// Additional throw impulse approached as the charge is held
    pub throw_charge_impulse: f32,

    /// Rate at which the charge curve saturates (per second of hold)
    pub throw_charge_rate: f32,

    /// How much of the player's velocity a thrown body inherits
    pub throw_velocity_inherit: f32,

    /// Spawn distance in front of the capsule end, in capsule radii
    pub throw_spawn_offset: f32,

    /// Player vertical position below which the session resets
    pub oob_floor: f32,

    /// Parking height for not-yet-thrown bodies (far below the world, so
    /// they collide with nothing)
    pub parked_body_y: f32,

    /// Spatial index build thresholds
    pub octree: OctreeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            steps_per_frame: 5,
            max_frame_delta: 0.05,
            body_count: 100,
            body_radius: 0.2,
            player_damping: 4.0,
            air_damping_scale: 0.1,
            body_damping: 1.5,
            world_bounce: 1.5,
            ground_control_speed: 25.0,
            air_control_speed: 8.0,
            jump_speed: 15.0,
            throw_base_impulse: 15.0,
            throw_charge_impulse: 30.0,
            throw_charge_rate: 1.0,
            throw_velocity_inherit: 2.0,
            throw_spawn_offset: 1.5,
            oob_floor: -25.0,
            parked_body_y: -100.0,
            octree: OctreeConfig::default(),
        }
    }
}

impl Config for SimulationConfig {}
