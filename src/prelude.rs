//! Crate's core types reimports.

pub use crate::{
    bounding::{Aabb, Float, TVec3},
    bounding_box::BoundingBox,
    collider::{Collider, DEFAULT_OCTREE_DEPTH},
    config::CollisionConfig,
    node::NodeType,
    tree::{Octree, MAX_OCTREE_DEPTH},
    world::CollisionWorld,
    ColliderId, CollisionError, NodeId,
};

#[cfg(feature = "bevy")]
pub use crate::bevy_integration::HitResult;
