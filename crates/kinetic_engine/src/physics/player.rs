//! Player state
//!
//! The player is a capsule-shaped body owned exclusively by the physics
//! integrator. `on_floor` is derived each substep from the most recent
//! world-contact normal's vertical component.

use crate::collision::Capsule;
use crate::foundation::math::Vec3;

/// Spawn pose: capsule radius
pub const SPAWN_RADIUS: f32 = 0.35;

/// The capsule every session starts from (and resets to)
pub fn spawn_capsule() -> Capsule {
    Capsule::new(
        Vec3::new(0.0, SPAWN_RADIUS, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        SPAWN_RADIUS,
    )
}

/// The player's collision volume and motion state
#[derive(Debug, Clone, Copy)]
pub struct Player {
    /// Collision capsule, translated in place during resolution
    pub collider: Capsule,
    /// Current velocity
    pub velocity: Vec3,
    /// Whether the most recent world contact had an upward-pointing normal
    pub on_floor: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Create a player at the spawn pose
    pub fn new() -> Self {
        Self {
            collider: spawn_capsule(),
            velocity: Vec3::zeros(),
            on_floor: false,
        }
    }

    /// Restore the spawn capsule and clear all motion state
    pub fn reset_pose(&mut self) {
        self.collider = spawn_capsule();
        self.velocity = Vec3::zeros();
        self.on_floor = false;
    }

    /// The point the presentation layer attaches its camera to
    pub fn eye(&self) -> Vec3 {
        self.collider.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reset_pose_restores_spawn_capsule() {
        let mut player = Player::new();
        player.collider.translate(Vec3::new(3.0, -31.0, 7.0));
        player.velocity = Vec3::new(1.0, -20.0, 0.0);
        player.on_floor = true;

        player.reset_pose();

        assert_relative_eq!(player.collider.start.y, 0.35);
        assert_relative_eq!(player.collider.end.y, 1.0);
        assert_relative_eq!(player.collider.radius, 0.35);
        assert_relative_eq!(player.velocity.magnitude(), 0.0);
        assert!(!player.on_floor);
    }
}
