//! [`CollisionWorld`]: registry of live colliders and the per frame loop.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::{
    bounding::{Float, TVec3},
    collider::Collider,
    config::CollisionConfig,
    pool::Pool,
    ColliderId, CollisionError,
};

/// Owns every registered [`Collider`] and recomputes their overlap sets
/// once per frame.
///
/// The scene object a collider represents keeps its [`ColliderId`] or name
/// and removes the collider when it is destroyed.
///
/// ```rust
/// use okcollide::prelude::*;
///
/// let mut world = CollisionWorld::new();
/// let cube = |c: f32| {
///     Aabb::from_min_max(TVec3::new(c - 0.5, -0.5, -0.5), TVec3::new(c + 0.5, 0.5, 0.5)).corners()
/// };
///
/// world.insert("left", &cube(0.0))?;
/// world.insert("right", &cube(1.0))?;
///
/// assert_eq!(world.collision_loop(), 1);
/// assert!(world.collider("left").unwrap().is_collided_with("right"));
///
/// world.translate("right", TVec3::new(2.5, 0.0, 0.0))?;
/// assert_eq!(world.collision_loop(), 0);
/// assert!(!world.collider("left").unwrap().is_collided_with_any());
/// # Ok::<(), CollisionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CollisionWorld<F: Float = f32> {
    colliders: Pool<Collider<F>>,
    names: HashMap<String, ColliderId>,
    config: CollisionConfig,
}

impl<F: Float> Default for CollisionWorld<F> {
    fn default() -> Self {
        Self::with_config(CollisionConfig::default())
    }
}

impl<F: Float> CollisionWorld<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CollisionConfig) -> Self {
        CollisionWorld {
            colliders: Default::default(),
            names: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// When inactive, [`collision_loop`](CollisionWorld::collision_loop) does nothing.
    pub fn set_active(&mut self, active: bool) {
        self.config.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.config.active
    }

    /// Registers a collider under its own name.
    pub fn add_collider(&mut self, collider: Collider<F>) -> Result<ColliderId, CollisionError> {
        if self.names.contains_key(collider.name()) {
            log::warn!("Collider {:?} is already registered", collider.name());
            return Err(CollisionError::DuplicateCollider(format!(
                "Collider {:?} is already registered",
                collider.name()
            )));
        }

        let name = collider.name().to_owned();
        let id = self.colliders.insert(collider);
        log::debug!("Registered collider {name:?} as {id}");
        self.names.insert(name, id);
        Ok(id)
    }

    /// Builds a collider with the configured octree depth and registers it.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        points: &[TVec3<F>],
    ) -> Result<ColliderId, CollisionError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            log::warn!("Collider {name:?} is already registered");
            return Err(CollisionError::DuplicateCollider(format!(
                "Collider {name:?} is already registered"
            )));
        }

        let depth = self.config.effective_depth(self.config.octree_depth);
        let collider = Collider::new(name, points, depth)?;
        self.add_collider(collider)
    }

    /// Unregisters a collider and hands it back.
    ///
    /// Its name is dropped from the overlap sets of the remaining colliders.
    pub fn remove_collider(&mut self, name: &str) -> Result<Collider<F>, CollisionError> {
        let id = self.names.remove(name).ok_or_else(|| {
            CollisionError::ColliderNotFound(format!("Removing collider {name:?}"))
        })?;
        let collider = self.colliders.remove(id).ok_or_else(|| {
            CollisionError::ColliderNotFound(format!("Collider {name:?} has no slot {id}"))
        })?;

        for other in self.colliders.iter_mut() {
            other.collided.remove(name);
        }
        log::debug!("Removed collider {name:?} from {id}");
        Ok(collider)
    }

    pub fn id(&self, name: &str) -> Option<ColliderId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: ColliderId) -> Option<&Collider<F>> {
        self.colliders.get(id)
    }

    pub fn collider(&self, name: &str) -> Option<&Collider<F>> {
        self.id(name).and_then(|id| self.colliders.get(id))
    }

    /// Only the world hands out mutable colliders, so their names
    /// always match the index.
    fn collider_mut(&mut self, name: &str) -> Option<&mut Collider<F>> {
        let id = self.id(name)?;
        self.colliders.get_mut(id)
    }

    /// Moves a registered collider by `delta`.
    pub fn translate(&mut self, name: &str, delta: TVec3<F>) -> Result<(), CollisionError> {
        let collider = self.collider_mut(name).ok_or_else(|| {
            CollisionError::ColliderNotFound(format!("Translating collider {name:?}"))
        })?;
        collider.translate(delta);
        Ok(())
    }

    /// Places a registered collider at `position`.
    pub fn set_position(&mut self, name: &str, position: TVec3<F>) -> Result<(), CollisionError> {
        let collider = self.collider_mut(name).ok_or_else(|| {
            CollisionError::ColliderNotFound(format!("Positioning collider {name:?}"))
        })?;
        collider.set_position(position);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collider<F>> + '_ {
        self.colliders.iter()
    }

    /// Recomputes the overlap set of every registered collider.
    ///
    /// All sets are cleared, then every unordered pair is tested once and
    /// both sides of an overlapping pair record each other. Returns the
    /// number of overlapping pairs, `0` when the world is inactive.
    pub fn collision_loop(&mut self) -> usize {
        if !self.config.active {
            return 0;
        }

        for collider in self.colliders.iter_mut() {
            collider.collided.clear();
        }

        let ids: SmallVec<[ColliderId; 32]> = self
            .colliders
            .iter_elements::<ColliderId>()
            .map(|(id, _)| id)
            .collect();

        let mut hits: Vec<(ColliderId, ColliderId)> = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if self.colliders[a].check_collision(&self.colliders[b]) {
                    log::trace!(
                        "{:?} overlaps {:?}",
                        self.colliders[a].name(),
                        self.colliders[b].name()
                    );
                    hits.push((a, b));
                }
            }
        }

        for &(a, b) in &hits {
            let name_a = self.colliders[a].name().to_owned();
            let name_b = self.colliders[b].name().to_owned();
            self.colliders[a].collided.insert(name_b);
            self.colliders[b].collided.insert(name_a);
        }

        log::debug!(
            "Collision loop: {} colliders, {} overlapping pairs",
            ids.len(),
            hits.len()
        );
        hits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding::Aabb;

    fn cube(center: TVec3<f32>) -> [TVec3<f32>; 8] {
        Aabb::from_min_max(center - TVec3::splat(0.5), center + TVec3::splat(0.5)).corners()
    }

    fn collided_names(world: &CollisionWorld, name: &str) -> Vec<String> {
        world
            .collider(name)
            .unwrap()
            .collided_objects()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_add_remove() {
        let mut world = CollisionWorld::new();
        assert!(world.is_empty());

        let a = world.insert("a", &cube(TVec3::zero())).unwrap();
        let b = world
            .add_collider(Collider::new("b", &cube(TVec3::splat(4.0)), 1).unwrap())
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(world.len(), 2);
        assert_eq!(world.id("a"), Some(a));
        assert_eq!(world.get(b).map(Collider::name), Some("b"));
        assert_eq!(
            world.collider("a").unwrap().aabb().octree().depth(),
            world.config().octree_depth
        );

        assert!(matches!(
            world.insert("a", &cube(TVec3::zero())),
            Err(CollisionError::DuplicateCollider(_))
        ));
        assert!(matches!(
            world.insert("c", &[]),
            Err(CollisionError::InvalidGeometry(_))
        ));

        let removed = world.remove_collider("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert_eq!(world.len(), 1);
        assert!(world.collider("a").is_none());
        assert!(matches!(
            world.remove_collider("a"),
            Err(CollisionError::ColliderNotFound(_))
        ));

        // The vacated slot is reused.
        let c = world.insert("c", &cube(TVec3::zero())).unwrap();
        assert_eq!(c, a);
    }

    #[test]
    fn test_inactive_world() {
        let mut world = CollisionWorld::new();
        world.insert("a", &cube(TVec3::zero())).unwrap();
        world.insert("b", &cube(TVec3::zero())).unwrap();

        assert_eq!(world.collision_loop(), 1);
        world.set_active(false);
        assert!(!world.is_active());

        world.translate("b", TVec3::splat(10.0)).unwrap();
        assert_eq!(world.collision_loop(), 0);
        // Stale state is kept until the loop runs again.
        assert!(world.collider("a").unwrap().is_collided_with("b"));

        world.set_active(true);
        assert_eq!(world.collision_loop(), 0);
        assert!(!world.collider("a").unwrap().is_collided_with_any());
    }

    #[test]
    fn test_remove_purges_overlaps() {
        let mut world = CollisionWorld::new();
        world.insert("a", &cube(TVec3::zero())).unwrap();
        world.insert("b", &cube(TVec3::new(1.0, 0.0, 0.0))).unwrap();
        assert_eq!(world.collision_loop(), 1);

        world.remove_collider("b").unwrap();
        assert!(!world.collider("a").unwrap().is_collided_with_any());
    }

    #[test]
    fn test_names_follow_colliders() {
        let mut world = CollisionWorld::new();
        let a = world.insert("a", &cube(TVec3::zero())).unwrap();
        world.remove_collider("a").unwrap();

        // The name is free again and resolves to the new collider only.
        let a2 = world.insert("a", &cube(TVec3::splat(3.0))).unwrap();
        let b = world.insert("b", &cube(TVec3::zero())).unwrap();
        assert_eq!(a2, a);
        assert_ne!(b, a2);
        assert_eq!(world.collider("a").map(Collider::name), Some("a"));
        assert_eq!(world.collider("b").map(Collider::name), Some("b"));
        assert_eq!(world.get(b).map(Collider::name), Some("b"));
        for collider in world.iter() {
            let id = world.id(collider.name()).unwrap();
            assert_eq!(world.get(id).map(Collider::name), Some(collider.name()));
        }

        // Positions are offsets from the frame the points were given in.
        world.set_position("a", TVec3::splat(-3.0)).unwrap();
        assert_eq!(world.collider("a").unwrap().position(), TVec3::splat(-3.0));
        assert_eq!(world.collision_loop(), 1);
        assert!(matches!(
            world.set_position("c", TVec3::zero()),
            Err(CollisionError::ColliderNotFound(_))
        ));
    }

    #[test]
    fn test_translate_unknown() {
        let mut world = CollisionWorld::<f32>::new();
        assert!(matches!(
            world.translate("nope", TVec3::zero()),
            Err(CollisionError::ColliderNotFound(_))
        ));
    }

    #[test]
    fn test_depth_is_clamped() {
        let mut world = CollisionWorld::with_config(CollisionConfig {
            octree_depth: 9,
            max_octree_depth: 2,
            active: true,
        });
        let id = world.insert("a", &cube(TVec3::zero())).unwrap();
        assert_eq!(world.get(id).unwrap().aabb().octree().depth(), 2);
    }

    #[test]
    fn test_three_colliders() {
        let mut world = CollisionWorld::new();
        world.insert("a", &cube(TVec3::zero())).unwrap();
        // Only the corner leaves hold mesh vertices, the cubes touch there.
        world.insert("b", &cube(TVec3::new(1.0, 0.0, 0.0))).unwrap();
        world.insert("c", &cube(TVec3::new(2.0, 0.0, 0.0))).unwrap();

        assert_eq!(world.collision_loop(), 2);
        assert_eq!(collided_names(&world, "a"), vec!["b"]);
        assert_eq!(collided_names(&world, "b"), vec!["a", "c"]);
        assert_eq!(collided_names(&world, "c"), vec!["b"]);

        // Running again with nothing moved gives the same sets.
        assert_eq!(world.collision_loop(), 2);
        assert_eq!(collided_names(&world, "a"), vec!["b"]);
        assert_eq!(collided_names(&world, "b"), vec!["a", "c"]);
        assert_eq!(collided_names(&world, "c"), vec!["b"]);
    }
}
