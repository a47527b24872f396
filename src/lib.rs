//! Octree accelerated [`collision detection`](world::CollisionWorld) between point clouds.
//!
//! Every [`Collider`](collider::Collider) wraps the vertex positions of a mesh in an
//! axis aligned [`BoundingBox`](bounding_box::BoundingBox) subdivided by a fixed depth
//! [`Octree`](tree::Octree). Each octree node remembers whether a vertex fell into it,
//! so two colliders only collide when occupied leaves overlap, not merely their boxes.
//!
//! ## Available methods:
//!
//! - ### Colliders
//!
//!   - [`Construction`](collider::Collider::new)
//!   - [`Translation`](collider::Collider::translate), O(1)
//!   - [`Pairwise query`](collider::Collider::check_collision)
//!   - [`Overlapping leaves`](collider::Collider::collided_leaves)
//!
//! - ### World
//!
//!   - [`Registration`](world::CollisionWorld::add_collider)
//!   - [`Removing`](world::CollisionWorld::remove_collider)
//!   - [`Per frame loop`](world::CollisionWorld::collision_loop)
//!
//! - ### Octree queries
//!
//!   - [`Custom region intersection`](tree::Octree::intersect_with)
//!   - [`Bevy bounding volume intersection`](tree::Octree::intersect) (`bevy` feature)
//!
//! ## Optimizations:
//!
//! - Moving a collider only updates an offset. Octree bounds stay local and offsets are applied while testing.
//! - Subtrees without vertices are pruned during the pairwise descent.
//! - Tree structure is represented by flat [`Pool`](`pool::Pool`) of nodes addressed by [`NodeId`].
//! - Traversals run on [`smallvec`] and [`heapless`] stacks.
//!
//! ## Example
//!
//! ```rust
//! use okcollide::prelude::*;
//!
//! fn main() -> Result<(), CollisionError> {
//!     let cube = |x: f32| {
//!         Aabb::from_min_max(TVec3::new(x - 0.5, -0.5, -0.5), TVec3::new(x + 0.5, 0.5, 0.5))
//!             .corners()
//!     };
//!
//!     let mut world = CollisionWorld::new();
//!     world.add_collider(Collider::new("box", &cube(0.0), 1)?)?;
//!     world.add_collider(Collider::new("crate", &cube(0.5), 1)?)?;
//!
//!     world.collision_loop();
//!     assert!(world.collider("box").unwrap().is_collided_with("crate"));
//!
//!     // Move away
//!     world.translate("crate", TVec3::new(2.5, 0.0, 0.0))?;
//!     world.collision_loop();
//!     assert!(!world.collider("box").unwrap().is_collided_with_any());
//!
//!     Ok(())
//! }
//! ```
//!
//! Optional features:
//!
//! - `bevy`: conversions from and to [Bevy](https://docs.rs/bevy/) math types.
//! - `serde`: `Serialize`/`Deserialize` for [`CollisionConfig`](config::CollisionConfig) and the primitives.
//!
//! ## Check yourself list:
//!
//! - tests
//!
//!   ```sh
//!   cargo test --all-targets --all-features --release
//!   ```
//!
//! - benchmark
//!
//!   ```sh
//!   cargo bench
//!   ```

#[cfg(feature = "bevy")]
pub mod bevy_integration;
pub mod bounding;
pub mod bounding_box;
pub mod collider;
pub mod config;
pub mod intersect_with;
pub mod node;
pub mod pool;
pub mod prelude;
pub mod tree;
pub mod world;

use std::fmt;

/// Index [`tree.nodes`](pool::Pool) with it.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub u32);

impl From<NodeId> for usize {
    fn from(value: NodeId) -> Self {
        value.0 as usize
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value as u32)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId {}", self.0)
    }
}

/// Index the [`pool`](pool::Pool) of a [`CollisionWorld`](world::CollisionWorld) with it.
/// Stays valid until the collider is removed, after which
/// the id may be handed to a new collider.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ColliderId(pub u32);

impl From<ColliderId> for usize {
    fn from(value: ColliderId) -> Self {
        value.0 as usize
    }
}

impl From<usize> for ColliderId {
    fn from(value: usize) -> Self {
        ColliderId(value as u32)
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColliderId: {}", self.0)
    }
}

/// Enum of all possible errors of the collision operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// Geometry that can not be bounded, e.g. an empty point set.
    #[error("Invalid geometry. {0}")]
    InvalidGeometry(String),

    /// A collider with the same name is already registered.
    #[error("Duplicate collider. {0}")]
    DuplicateCollider(String),

    /// No collider is registered under the name.
    #[error("Collider not found. {0}")]
    ColliderNotFound(String),

    /// Octree deeper than [`MAX_OCTREE_DEPTH`](tree::MAX_OCTREE_DEPTH) was requested.
    #[error("Depth out of range. {0}")]
    DepthOutOfRange(String),
}
