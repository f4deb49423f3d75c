//! Primitive collision shapes and intersection algorithms
//!
//! Provides the geometric primitives (AABBs, triangles, spheres, capsules)
//! with closest-point and penetration testing routines. Everything here is
//! pure and allocation-free; distance comparisons stay squared until a
//! contact is confirmed, at which point a single square root produces the
//! penetration depth.

use crate::foundation::math::{utils, Vec3};

/// Result of a penetration query
///
/// The normal is a unit vector pointing from the static surface toward the
/// moving primitive; the depth is the overlap distance along it.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Separation direction (unit length)
    pub normal: Vec3,
    /// Penetration depth along the normal (always >= 0)
    pub depth: f32,
}

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Grow this AABB to contain another AABB
    pub fn merge(&mut self, other: &Aabb) {
        self.min = Vec3::new(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.min.z.min(other.min.z),
        );
        self.max = Vec3::new(
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
            self.max.z.max(other.max.z),
        );
    }

    /// Return this AABB uniformly padded on every side
    pub fn padded(&self, padding: f32) -> Self {
        let pad = Vec3::new(padding, padding, padding);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }
}

/// Get the closest point on a segment to a given point
pub fn closest_point_on_segment(point: Vec3, seg_start: Vec3, seg_end: Vec3) -> Vec3 {
    let axis = seg_end - seg_start;
    let length_sq = axis.magnitude_squared();

    // Degenerate segment collapses to its start point
    if length_sq <= f32::EPSILON {
        return seg_start;
    }

    let t = ((point - seg_start).dot(&axis) / length_sq).clamp(0.0, 1.0);
    seg_start + axis * t
}

/// A bounding sphere used both as a dynamic body collider and as a world
/// query primitive
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &Sphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared < radius_sum * radius_sum
    }

    /// Get the world-space bounds of this sphere
    pub fn aabb(&self) -> Aabb {
        let extents = Vec3::new(self.radius, self.radius, self.radius);
        Aabb::from_center_extents(self.center, extents)
    }
}

/// A capsule (segment plus radius) representing the player's collision
/// volume
///
/// Mutated in place by translation during contact resolution.
#[derive(Debug, Clone, Copy)]
pub struct Capsule {
    /// Bottom point of the capsule axis
    pub start: Vec3,
    /// Top point of the capsule axis
    pub end: Vec3,
    /// The radius around the axis
    pub radius: f32,
}

impl Capsule {
    /// Creates a new capsule from its axis endpoints and radius
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Translate the capsule by a delta vector
    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// Get the midpoint of the capsule axis
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// The three characteristic points tested against body spheres:
    /// axis start, axis end, and axis midpoint
    pub fn probe_points(&self) -> [Vec3; 3] {
        [self.start, self.end, self.center()]
    }

    /// Get the world-space bounds of this capsule
    pub fn aabb(&self) -> Aabb {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        let min = Vec3::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.z.min(self.end.z),
        );
        let max = Vec3::new(
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
            self.start.z.max(self.end.z),
        );
        Aabb::new(min - r, max + r)
    }
}

/// A triangle of the static collision surface
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// First vertex in world space
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the unit normal of the triangle (right-hand rule)
    ///
    /// Returns `None` for degenerate (zero-area) triangles instead of
    /// propagating NaN from a zero-vector normalization.
    pub fn normal(&self) -> Option<Vec3> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        utils::safe_normalize(edge1.cross(&edge2))
    }

    /// Get the world-space bounds of this triangle
    pub fn aabb(&self) -> Aabb {
        let min = Vec3::new(
            self.v0.x.min(self.v1.x).min(self.v2.x),
            self.v0.y.min(self.v1.y).min(self.v2.y),
            self.v0.z.min(self.v1.z).min(self.v2.z),
        );
        let max = Vec3::new(
            self.v0.x.max(self.v1.x).max(self.v2.x),
            self.v0.y.max(self.v1.y).max(self.v2.y),
            self.v0.z.max(self.v1.z).max(self.v2.z),
        );
        Aabb::new(min, max)
    }

    /// Signed distance from a point to the triangle plane
    fn plane_distance(&self, point: Vec3, normal: Vec3) -> f32 {
        normal.dot(&(point - self.v0))
    }

    /// Get the closest point on the triangle to a given point
    /// (barycentric-region clamp)
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let v0_to_point = point - self.v0;

        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);

        // Vertex region outside v0
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        // Vertex region outside v1
        let v1_to_point = point - self.v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        // Vertex region outside v2
        let v2_to_point = point - self.v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        // Edge regions
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return self.v0 + edge1 * v;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + edge2 * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        // Point projects inside the triangle
        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        self.v0 + edge1 * v + edge2 * w
    }

    /// Test sphere penetration against this triangle
    ///
    /// Contact exists iff the closest point on the triangle lies strictly
    /// inside the sphere; the depth is `radius - distance`.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<Contact> {
        let normal = self.normal()?;

        // Centers farther from the plane than the radius cannot touch:
        // the closest-point distance is bounded below by the plane distance.
        if self.plane_distance(sphere.center, normal).abs() > sphere.radius {
            return None;
        }

        let closest = self.closest_point(sphere.center);
        let offset = sphere.center - closest;
        let distance_sq = offset.magnitude_squared();
        if distance_sq >= sphere.radius * sphere.radius {
            return None;
        }

        let distance = distance_sq.sqrt();
        let contact_normal = utils::safe_normalize(offset).unwrap_or(normal);
        Some(Contact {
            normal: contact_normal,
            depth: sphere.radius - distance,
        })
    }

    /// Test capsule penetration against this triangle
    ///
    /// Finds the reference point on the capsule axis (the plane crossing
    /// point, or the endpoint nearer the plane), clamps it into the
    /// triangle, and measures the segment's distance to that clamped point.
    pub fn intersect_capsule(&self, capsule: &Capsule) -> Option<Contact> {
        let normal = self.normal()?;

        let d_start = self.plane_distance(capsule.start, normal);
        let d_end = self.plane_distance(capsule.end, normal);

        let reference = if d_start * d_end < 0.0 {
            // Axis crosses the plane; use the crossing point
            let t = d_start / (d_start - d_end);
            capsule.start + (capsule.end - capsule.start) * t
        } else if d_start.abs() < d_end.abs() {
            capsule.start
        } else {
            capsule.end
        };

        let tri_point = self.closest_point(reference);
        let axis_point = closest_point_on_segment(tri_point, capsule.start, capsule.end);

        let offset = axis_point - tri_point;
        let distance_sq = offset.magnitude_squared();
        if distance_sq >= capsule.radius * capsule.radius {
            return None;
        }

        let distance = distance_sq.sqrt();
        let contact_normal = utils::safe_normalize(offset).unwrap_or(normal);
        Some(Contact {
            normal: contact_normal,
            depth: capsule.radius - distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle() -> Triangle {
        // Large horizontal patch around the origin, normal +Y
        Triangle::new(
            Vec3::new(-100.0, 0.0, -100.0),
            Vec3::new(0.0, 0.0, 100.0),
            Vec3::new(100.0, 0.0, -100.0),
        )
    }

    #[test]
    fn test_closest_point_on_segment_clamps_endpoints() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 0.0, 0.0);

        let before = closest_point_on_segment(Vec3::new(-5.0, 1.0, 0.0), a, b);
        assert_relative_eq!(before.x, 0.0);

        let after = closest_point_on_segment(Vec3::new(15.0, 1.0, 0.0), a, b);
        assert_relative_eq!(after.x, 10.0);

        let mid = closest_point_on_segment(Vec3::new(4.0, 3.0, 0.0), a, b);
        assert_relative_eq!(mid.x, 4.0);
        assert_relative_eq!(mid.y, 0.0);
    }

    #[test]
    fn test_triangle_closest_point_interior_and_vertex() {
        let tri = floor_triangle();

        let interior = tri.closest_point(Vec3::new(1.0, 5.0, 1.0));
        assert_relative_eq!(interior.x, 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(interior.y, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(interior.z, 1.0, epsilon = 1.0e-5);

        let corner = tri.closest_point(Vec3::new(0.0, 2.0, 500.0));
        assert_relative_eq!(corner.z, 100.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_sphere_far_from_plane_has_no_contact() {
        let tri = floor_triangle();
        let sphere = Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0);
        assert!(tri.intersect_sphere(&sphere).is_none());
    }

    #[test]
    fn test_sphere_under_floor_contact_normal_and_depth() {
        let tri = floor_triangle();
        // Center at depth 0.1 below the surface of a radius 0.5 sphere
        // resting partially submerged; depth must be r - d.
        let sphere = Sphere::new(Vec3::new(0.0, 0.1, 0.0), 0.5);
        let contact = tri.intersect_sphere(&sphere).unwrap();

        assert_relative_eq!(contact.normal.y, 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(contact.depth, 0.4, epsilon = 1.0e-5);
    }

    #[test]
    fn test_sphere_resolution_is_idempotent() {
        let tri = floor_triangle();
        let mut sphere = Sphere::new(Vec3::new(0.0, 0.1, 0.0), 0.5);

        let contact = tri.intersect_sphere(&sphere).unwrap();
        sphere.center += contact.normal * contact.depth;

        // After push-out any residual depth must be numerically zero.
        if let Some(again) = tri.intersect_sphere(&sphere) {
            assert!(again.depth < 1.0e-4);
        }
    }

    #[test]
    fn test_capsule_standing_on_floor() {
        let tri = floor_triangle();
        // Capsule bottom sphere penetrating the floor by 0.15
        let capsule = Capsule::new(
            Vec3::new(0.0, 0.2, 0.0),
            Vec3::new(0.0, 0.85, 0.0),
            0.35,
        );
        let contact = tri.intersect_capsule(&capsule).unwrap();

        assert_relative_eq!(contact.normal.y, 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(contact.depth, 0.15, epsilon = 1.0e-5);
    }

    #[test]
    fn test_capsule_above_floor_has_no_contact() {
        let tri = floor_triangle();
        let capsule = Capsule::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.65, 0.0),
            0.35,
        );
        assert!(tri.intersect_capsule(&capsule).is_none());
    }

    #[test]
    fn test_capsule_crossing_plane_reports_contact() {
        let tri = floor_triangle();
        // Axis straddles the plane entirely
        let capsule = Capsule::new(
            Vec3::new(0.0, -0.3, 0.0),
            Vec3::new(0.0, 0.4, 0.0),
            0.35,
        );
        let contact = tri.intersect_capsule(&capsule).unwrap();
        assert!(contact.depth > 0.0);
    }

    #[test]
    fn test_degenerate_triangle_yields_no_contact() {
        let tri = Triangle::new(Vec3::zeros(), Vec3::zeros(), Vec3::zeros());
        let sphere = Sphere::new(Vec3::zeros(), 1.0);
        assert!(tri.intersect_sphere(&sphere).is_none());

        let capsule = Capsule::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.5);
        assert!(tri.intersect_capsule(&capsule).is_none());
    }

    #[test]
    fn test_aabb_intersects_and_merge() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(2.0, 2.0, 2.0));
        let c = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(6.0, 6.0, 6.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));

        let mut merged = a;
        merged.merge(&c);
        assert!(merged.contains_point(Vec3::new(5.5, 5.5, 5.5)));
        assert!(merged.contains_point(Vec3::new(0.5, 0.5, 0.5)));
    }
}
