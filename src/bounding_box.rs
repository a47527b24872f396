//! Axis aligned bounding box of a point cloud with its [`Octree`].

use crate::{
    bounding::{Aabb, Float, TVec3},
    tree::{Octree, MAX_OCTREE_DEPTH},
    CollisionError, NodeId,
};

/// Bounds of a point cloud, computed once at construction, plus the octree
/// built over them and the translation accumulated since.
///
/// Moving the box only changes `position`; the extents and the octree stay
/// in the local frame they were built in.
#[derive(Clone, Debug)]
pub struct BoundingBox<F: Float = f32> {
    extents: Aabb<F>,
    octree: Octree<F>,
    position: TVec3<F>,
}

impl<F: Float> BoundingBox<F> {
    /// Computes the extents of `points` and builds an octree `depth` levels deep
    /// tagged with the same points.
    ///
    /// Fails with [`CollisionError::InvalidGeometry`] if `points` is empty and
    /// with [`CollisionError::DepthOutOfRange`] if `depth` exceeds [`MAX_OCTREE_DEPTH`].
    pub fn from_points(points: &[TVec3<F>], depth: u32) -> Result<Self, CollisionError> {
        if depth > MAX_OCTREE_DEPTH {
            return Err(CollisionError::DepthOutOfRange(format!(
                "Octree depth {depth} exceeds the maximum of {MAX_OCTREE_DEPTH}"
            )));
        }

        let extents = Aabb::from_points(points).ok_or_else(|| {
            CollisionError::InvalidGeometry("Bounding box of an empty point set".into())
        })?;
        let octree = Octree::build(extents, depth, points);

        Ok(BoundingBox {
            extents,
            octree,
            position: TVec3::zero(),
        })
    }

    /// `true` if at least one pair of occupied leaves overlaps.
    pub fn check_collision(&self, other: &BoundingBox<F>) -> bool {
        self.octree.intersects(&other.octree, self.position, other.position)
    }

    /// Every pair of overlapping leaves `(own leaf, other's leaf)`.
    pub fn collided_leaves(&self, other: &BoundingBox<F>) -> Vec<(NodeId, NodeId)> {
        self.octree.check_collision(&other.octree, self.position, other.position)
    }

    pub fn translate(&mut self, delta: TVec3<F>) {
        self.position += delta;
    }

    pub fn position(&self) -> TVec3<F> {
        self.position
    }

    pub fn set_position(&mut self, position: TVec3<F>) {
        self.position = position;
    }

    pub fn min_vertex(&self) -> TVec3<F> {
        self.extents.min
    }

    pub fn max_vertex(&self) -> TVec3<F> {
        self.extents.max
    }

    /// Construction-time extents.
    pub fn extents(&self) -> Aabb<F> {
        self.extents
    }

    /// Extents moved to the current position.
    pub fn world_extents(&self) -> Aabb<F> {
        self.extents.translated(self.position)
    }

    /// World space corners of the box.
    pub fn corners(&self) -> [TVec3<F>; 8] {
        self.world_extents().corners()
    }

    pub fn octree(&self) -> &Octree<F> {
        &self.octree
    }

    /// World space boxes of every leaf holding a mesh vertex.
    pub fn occupied_leaves(&self) -> Vec<Aabb<F>> {
        let mut boxes = Vec::new();
        self.octree
            .intersect_with_for_each(self.position, |_| true, |_, aabb| boxes.push(aabb));
        boxes
    }
}
