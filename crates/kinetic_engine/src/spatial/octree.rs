//! Triangle octree spatial partitioning structure
//!
//! Divides the static world's triangle set into hierarchical axis-aligned
//! regions so that capsule and sphere contact queries only run the narrow
//! phase against nearby triangles. Built once from a finalized triangle
//! set; read-only afterwards, so concurrent queries are safe.

use serde::{Deserialize, Serialize};

use crate::collision::{Aabb, Capsule, Contact, Sphere, Triangle};
use crate::foundation::math::Vec3;

/// Configuration for octree build behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OctreeConfig {
    /// Maximum triangles per node before subdivision
    pub max_triangles_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_triangles_per_node: 8,
            max_depth: 16,
        }
    }
}

/// Single node in the octree hierarchy
///
/// Nodes reference triangles by index into the tree's shared triangle
/// array; a triangle straddling an octant boundary is referenced by every
/// child whose box it overlaps, trading duplicate narrow-phase tests for
/// simpler overlap logic.
#[derive(Debug, Clone)]
struct OctreeNode {
    /// World-space bounds of this node
    bounds: Aabb,

    /// Indices into the shared triangle array (leaf nodes only)
    triangles: Vec<u32>,

    /// Child nodes (8 octants), None if this is a leaf
    children: Option<Box<[OctreeNode; 8]>>,
}

impl OctreeNode {
    fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            triangles: Vec::new(),
            children: None,
        }
    }

    /// Recursively split this node while its triangle count and depth
    /// exceed the configured thresholds
    fn split(&mut self, triangles: &[Triangle], depth: u32, config: &OctreeConfig) {
        if self.triangles.len() <= config.max_triangles_per_node || depth >= config.max_depth {
            return;
        }

        let center = self.bounds.center();
        let quarter_extents = self.bounds.extents() * 0.5;

        let mut children = Vec::with_capacity(8);
        for octant in 0..8 {
            let x_sign = if octant & 1 != 0 { 1.0 } else { -1.0 };
            let y_sign = if octant & 2 != 0 { 1.0 } else { -1.0 };
            let z_sign = if octant & 4 != 0 { 1.0 } else { -1.0 };

            let child_center = Vec3::new(
                center.x + quarter_extents.x * x_sign,
                center.y + quarter_extents.y * y_sign,
                center.z + quarter_extents.z * z_sign,
            );
            let child_bounds = Aabb::from_center_extents(child_center, quarter_extents);
            let mut child = OctreeNode::new(child_bounds);

            // A triangle goes into every octant its bounds overlap
            for &index in &self.triangles {
                let tri_bounds = triangles[index as usize].aabb();
                if child.bounds.intersects(&tri_bounds) {
                    child.triangles.push(index);
                }
            }

            child.split(triangles, depth + 1, config);
            children.push(child);
        }

        let children: [OctreeNode; 8] = match children.try_into() {
            Ok(array) => array,
            Err(_) => unreachable!(),
        };
        self.children = Some(Box::new(children));
        self.triangles = Vec::new();
    }

    /// Descend into nodes overlapping the query bounds, testing leaf
    /// triangles and keeping the contact with maximum penetration depth
    fn query_worst(
        &self,
        query_bounds: &Aabb,
        triangles: &[Triangle],
        test: &impl Fn(&Triangle) -> Option<Contact>,
        best: &mut Option<Contact>,
    ) {
        if !self.bounds.intersects(query_bounds) {
            return;
        }

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_worst(query_bounds, triangles, test, best);
            }
            return;
        }

        for &index in &self.triangles {
            if let Some(contact) = test(&triangles[index as usize]) {
                let is_worse = best.map_or(true, |b| contact.depth > b.depth);
                if is_worse {
                    *best = Some(contact);
                }
            }
        }
    }

    fn count_nodes(&self) -> usize {
        let mut count = 1;
        if let Some(ref children) = self.children {
            for child in children.iter() {
                count += child.count_nodes();
            }
        }
        count
    }
}

/// Static spatial index over the world's triangles
///
/// Answers "does this moving primitive intersect the static world, and if
/// so with what contact normal and penetration depth". The worst (deepest)
/// contact is returned so resolution pushes out along the most violated
/// constraint first.
#[derive(Debug, Clone)]
pub struct TriangleOctree {
    /// All world triangles, stored once and shared by every node
    triangles: Vec<Triangle>,

    /// Root node containing the entire world space
    root: OctreeNode,
}

impl TriangleOctree {
    /// Build an octree from a finalized triangle set
    ///
    /// An empty triangle set produces an index whose every query returns
    /// no contact.
    pub fn build(triangles: Vec<Triangle>, config: &OctreeConfig) -> Self {
        let mut bounds = Aabb::new(Vec3::zeros(), Vec3::zeros());
        if let Some((first, rest)) = triangles.split_first() {
            bounds = first.aabb();
            for tri in rest {
                bounds.merge(&tri.aabb());
            }
        }
        // Slight padding so surface triangles never sit exactly on the
        // root boundary
        bounds = bounds.padded(0.1);

        let mut root = OctreeNode::new(bounds);
        root.triangles = (0..triangles.len() as u32).collect();
        root.split(&triangles, 0, config);

        log::debug!(
            "octree built: {} triangles, {} nodes",
            triangles.len(),
            root.count_nodes()
        );

        Self { triangles, root }
    }

    /// Query the deepest contact between a capsule and the static world
    pub fn query_capsule(&self, capsule: &Capsule) -> Option<Contact> {
        let mut best = None;
        self.root.query_worst(
            &capsule.aabb(),
            &self.triangles,
            &|tri| tri.intersect_capsule(capsule),
            &mut best,
        );
        best
    }

    /// Query the deepest contact between a sphere and the static world
    pub fn query_sphere(&self, sphere: &Sphere) -> Option<Contact> {
        let mut best = None;
        self.root.query_worst(
            &sphere.aabb(),
            &self.triangles,
            &|tri| tri.intersect_sphere(sphere),
            &mut best,
        );
        best
    }

    /// Number of world triangles in the index
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of nodes in the hierarchy (for diagnostics)
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }
}
