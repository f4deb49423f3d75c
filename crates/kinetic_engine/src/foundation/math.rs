//! Math utilities and types
//!
//! Provides the fundamental math types used by the collision and physics
//! modules.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Tolerance used when normalizing near-zero vectors
pub const NORMALIZE_EPSILON: f32 = 1.0e-8;

/// Math utility functions
pub mod utils {
    use super::{Vec3, NORMALIZE_EPSILON};

    /// Normalize a vector, returning `None` for degenerate (near-zero) input
    ///
    /// Naive normalization of a zero vector produces NaN; collision code
    /// must treat that case as "no contact" instead.
    pub fn safe_normalize(v: Vec3) -> Option<Vec3> {
        v.try_normalize(NORMALIZE_EPSILON)
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Frame-rate-independent exponential decay term
    ///
    /// Returns `e^(-rate * dt) - 1`, a negative factor such that
    /// `v += v * term` is equivalent to `v *= e^(-rate * dt)`.
    pub fn damping_term(rate: f32, dt: f32) -> f32 {
        (-rate * dt).exp() - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::utils::{damping_term, safe_normalize};
    use super::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_safe_normalize_zero_vector() {
        assert!(safe_normalize(Vec3::zeros()).is_none());
    }

    #[test]
    fn test_safe_normalize_unit_result() {
        let n = safe_normalize(Vec3::new(3.0, 4.0, 0.0)).unwrap();
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(n.x, 0.6, epsilon = 1.0e-6);
    }

    #[test]
    fn test_damping_term_is_framerate_independent() {
        // Two half-steps must decay exactly as much as one full step.
        let mut v = 10.0_f32;
        v += v * damping_term(4.0, 0.005);
        v += v * damping_term(4.0, 0.005);

        let mut w = 10.0_f32;
        w += w * damping_term(4.0, 0.01);

        assert_relative_eq!(v, w, epsilon = 1.0e-4);
    }
}
