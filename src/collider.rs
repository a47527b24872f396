//! [`Collider`] binding a named point cloud to a [`BoundingBox`].

use std::collections::BTreeSet;

use crate::{
    bounding::{Float, TVec3},
    bounding_box::BoundingBox,
    CollisionError, NodeId,
};

/// Octree depth used by [`Collider::from_points`].
pub const DEFAULT_OCTREE_DEPTH: u32 = 4;

/// A named object's point cloud, its bounding box and the names of the
/// colliders it overlapped during the last
/// [`collision loop`](crate::world::CollisionWorld::collision_loop).
#[derive(Clone, Debug)]
pub struct Collider<F: Float = f32> {
    name: String,
    bounding_box: BoundingBox<F>,
    pub(crate) collided: BTreeSet<String>,
}

impl<F: Float> Collider<F> {
    /// Builds a collider over `points` with an octree `depth` levels deep.
    ///
    /// ```rust
    /// use okcollide::prelude::*;
    ///
    /// let points = [TVec3::new(0.0f32, 0.0, 0.0), TVec3::new(1.0, 1.0, 1.0)];
    /// let mut a = Collider::new("a", &points, 2)?;
    /// let b = Collider::new("b", &points, 2)?;
    /// assert!(a.check_collision(&b));
    ///
    /// a.translate(TVec3::new(5.0, 0.0, 0.0));
    /// assert!(!a.check_collision(&b));
    /// # Ok::<(), CollisionError>(())
    /// ```
    pub fn new(
        name: impl Into<String>,
        points: &[TVec3<F>],
        depth: u32,
    ) -> Result<Self, CollisionError> {
        let name = name.into();
        let bounding_box = BoundingBox::from_points(points, depth).map_err(|err| match err {
            CollisionError::InvalidGeometry(info) => {
                CollisionError::InvalidGeometry(format!("Collider {name:?}: {info}"))
            }
            err => err,
        })?;

        Ok(Collider {
            name,
            bounding_box,
            collided: BTreeSet::new(),
        })
    }

    /// Builds a collider with an octree [`DEFAULT_OCTREE_DEPTH`] levels deep.
    pub fn from_points(
        name: impl Into<String>,
        points: &[TVec3<F>],
    ) -> Result<Self, CollisionError> {
        Self::new(name, points, DEFAULT_OCTREE_DEPTH)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aabb(&self) -> &BoundingBox<F> {
        &self.bounding_box
    }

    pub fn translate(&mut self, delta: TVec3<F>) {
        self.bounding_box.translate(delta);
    }

    pub fn position(&self) -> TVec3<F> {
        self.bounding_box.position()
    }

    pub fn set_position(&mut self, position: TVec3<F>) {
        self.bounding_box.set_position(position);
    }

    /// Pure overlap query, does not touch the collided set.
    pub fn check_collision(&self, other: &Collider<F>) -> bool {
        self.bounding_box.check_collision(&other.bounding_box)
    }

    /// Every pair of overlapping leaves `(own leaf, other's leaf)`.
    pub fn collided_leaves(&self, other: &Collider<F>) -> Vec<(NodeId, NodeId)> {
        self.bounding_box.collided_leaves(&other.bounding_box)
    }

    /// Names of the colliders overlapping this one, sorted.
    pub fn collided_objects(&self) -> impl Iterator<Item = &str> + '_ {
        self.collided.iter().map(String::as_str)
    }

    pub fn is_collided_with(&self, name: &str) -> bool {
        self.collided.contains(name)
    }

    pub fn is_collided_with_any(&self) -> bool {
        !self.collided.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collider() {
        let err = Collider::<f32>::from_points("ghost", &[]).unwrap_err();
        assert_eq!(
            err,
            CollisionError::InvalidGeometry(
                "Collider \"ghost\": Bounding box of an empty point set".into()
            )
        );
    }

    #[test]
    fn test_too_deep() {
        let points = [TVec3::zero(), TVec3::splat(1.0f32)];
        assert!(matches!(
            Collider::new("deep", &points, 50),
            Err(CollisionError::DepthOutOfRange(_))
        ));
    }

    #[test]
    fn test_default_depth() {
        let collider = Collider::from_points("p", &[TVec3::splat(1.0f32)]).unwrap();
        assert_eq!(collider.name(), "p");
        assert_eq!(collider.aabb().octree().depth(), DEFAULT_OCTREE_DEPTH);
        assert!(!collider.is_collided_with_any());
        assert_eq!(collider.collided_objects().count(), 0);
    }

    #[test]
    fn test_translate_forwards() {
        let mut collider = Collider::new("c", &[TVec3::zero(), TVec3::splat(1.0f64)], 0).unwrap();
        collider.translate(TVec3::new(1.0, 2.0, 3.0));
        assert_eq!(collider.position(), TVec3::new(1.0, 2.0, 3.0));
        assert_eq!(collider.aabb().position(), collider.position());

        collider.set_position(TVec3::zero());
        assert_eq!(collider.position(), TVec3::zero());
    }

    #[test]
    fn test_collided_objects() {
        let mut collider = Collider::new("c", &[TVec3::splat(0.0f32)], 0).unwrap();
        collider.collided.insert("z".into());
        collider.collided.insert("a".into());

        assert!(collider.is_collided_with_any());
        assert!(collider.is_collided_with("a"));
        assert!(!collider.is_collided_with("b"));
        assert_eq!(collider.collided_objects().collect::<Vec<_>>(), vec!["a", "z"]);
    }
}
