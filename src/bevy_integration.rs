//! [Bevy](https://docs.rs/bevy/) game engine integrations.
//!
//! Adds the [Bevy](https://docs.rs/bevy/) game engine as a dependency.
//!
//! ### Intersections:
//! - any bevy bounding volume [intersection](Octree::intersect)
//! - [ray](RayCast3d) [intersection](Octree::ray_cast)
//!
//! ```ignore
//! let ray = RayCast3d::new(Vec3A::new(0.25, 0.25, -5.0), Dir3A::Z, 10.0);
//! let hit = collider.aabb().ray_cast(&ray);
//! ```

use bevy::math::{
    bounding::{Aabb3d, IntersectsVolume, RayCast3d},
    Vec3, Vec3A,
};

use crate::{
    bounding::{Aabb, TVec3},
    bounding_box::BoundingBox,
    collider::Collider,
    node::NodeType,
    tree::Octree,
    CollisionError, NodeId,
};

impl Octree<f32> {
    /// Occupied leaves of the tree placed at `offset` that intersect a bevy `volume`.
    pub fn intersect<V: IntersectsVolume<Aabb3d>>(
        &self,
        offset: TVec3<f32>,
        volume: &V,
    ) -> Vec<NodeId> {
        self.intersect_with(offset, |aabb| {
            let aabb: Aabb3d = (*aabb).into();
            volume.intersects(&aabb)
        })
    }

    /// Intersects occupied leaves of the tree placed at `offset` with the [RayCast3d].
    ///
    /// Returns a [HitResult] with the closest leaf and the distance to it, if any.
    pub fn ray_cast(&self, offset: TVec3<f32>, ray: &RayCast3d) -> HitResult {
        let mut hit = HitResult::default();
        self.recursive_ray_cast(self.root, offset, ray, &mut hit);
        hit
    }

    fn recursive_ray_cast(
        &self,
        node: NodeId,
        offset: TVec3<f32>,
        ray: &RayCast3d,
        hit: &mut HitResult,
    ) {
        let n = &self.nodes[node];

        if !n.has_mesh_vertex {
            return;
        }

        let aabb: Aabb3d = n.world_aabb(offset).into();
        let Some(dist) = ray.aabb_intersection_at(&aabb) else {
            return;
        };

        match n.ntype {
            NodeType::Branch(branch) => {
                for child in branch.children {
                    self.recursive_ray_cast(child, offset, ray, hit);
                }
            }

            NodeType::Leaf => match hit.leaf {
                Some(_) if hit.distance <= dist => (),
                _ => {
                    hit.leaf = Some(node);
                    hit.distance = dist;
                }
            },
        }
    }
}

impl BoundingBox<f32> {
    /// World space extents as a bevy [Aabb3d].
    pub fn world_aabb3d(&self) -> Aabb3d {
        self.world_extents().into()
    }

    /// Casts a ray against the occupied leaves at the current position.
    pub fn ray_cast(&self, ray: &RayCast3d) -> HitResult {
        self.octree().ray_cast(self.position(), ray)
    }
}

impl Collider<f32> {
    /// Builds a collider from bevy mesh positions.
    pub fn from_vec3s(
        name: impl Into<String>,
        positions: &[Vec3],
        depth: u32,
    ) -> Result<Self, CollisionError> {
        let points: Vec<TVec3<f32>> = positions.iter().copied().map(Into::into).collect();
        Collider::new(name, &points, depth)
    }
}

/// Intersection result.
///
/// Contains `Some(`[NodeId]`)` of the closest occupied leaf in case of intersection,
/// [None] otherwise.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub leaf: Option<NodeId>,
    pub distance: f32,
}

impl From<Aabb<f32>> for Aabb3d {
    fn from(value: Aabb<f32>) -> Self {
        Aabb3d {
            min: value.min.into(),
            max: value.max.into(),
        }
    }
}

impl From<TVec3<f32>> for Vec3A {
    fn from(value: TVec3<f32>) -> Self {
        Vec3A::new(value.x, value.y, value.z)
    }
}

impl From<TVec3<f32>> for Vec3 {
    fn from(value: TVec3<f32>) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

impl From<Vec3> for TVec3<f32> {
    fn from(value: Vec3) -> Self {
        TVec3::new(value.x, value.y, value.z)
    }
}

impl From<Vec3A> for TVec3<f32> {
    fn from(value: Vec3A) -> Self {
        TVec3::new(value.x, value.y, value.z)
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::{bounding::BoundingSphere, Dir3A};

    use super::*;

    fn cube(center: Vec3) -> Vec<Vec3> {
        Aabb::from_min_max(
            TVec3::from(center - Vec3::splat(0.5)),
            TVec3::from(center + Vec3::splat(0.5)),
        )
        .corners()
        .into_iter()
        .map(Vec3::from)
        .collect()
    }

    #[test]
    fn test_volume_intersection() {
        let mut collider = Collider::from_vec3s("cube", &cube(Vec3::ZERO), 2).unwrap();
        collider.translate(TVec3::new(10.0, 0.0, 0.0));

        let bbox = collider.aabb();
        let world = bbox.world_aabb3d();
        assert_eq!(world.min, Vec3A::new(9.5, -0.5, -0.5));
        assert_eq!(world.max, Vec3A::new(10.5, 0.5, 0.5));

        let tree = bbox.octree();
        let near_corner = BoundingSphere::new(Vec3A::new(10.5, 0.5, 0.5), 0.1);
        assert_eq!(tree.intersect(bbox.position(), &near_corner).len(), 1);

        // The center of the cube holds no vertex.
        let center = Aabb3d::new(Vec3A::new(10.0, 0.0, 0.0), Vec3A::splat(0.1));
        assert!(tree.intersect(bbox.position(), &center).is_empty());
    }

    #[test]
    fn test_ray_cast() {
        let collider = Collider::from_vec3s("cube", &cube(Vec3::ZERO), 1).unwrap();
        let bbox = collider.aabb();

        // Parallel to z, through two corner leaves.
        let ray = RayCast3d::new(Vec3A::new(0.4, 0.4, -5.0), Dir3A::Z, 10.0);
        let hit = bbox.ray_cast(&ray);
        assert_eq!(hit.leaf, bbox.octree().find_leaf(TVec3::new(0.5, 0.5, -0.5)));
        assert!((hit.distance - 4.5).abs() < 1e-5);

        // Misses the cube.
        let ray = RayCast3d::new(Vec3A::new(3.0, 3.0, -5.0), Dir3A::Z, 10.0);
        assert_eq!(bbox.ray_cast(&ray), HitResult::default());
    }
}
