//! [`CollisionConfig`] for a [`CollisionWorld`](crate::world::CollisionWorld).

use crate::collider::DEFAULT_OCTREE_DEPTH;

/// Deepest octree built unless configured otherwise.
///
/// A fully subdivided tree of depth `d` holds `(8^(d+1) - 1) / 7` nodes.
pub const DEFAULT_MAX_OCTREE_DEPTH: u32 = 6;

/// Settings of a collision world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CollisionConfig {
    /// Depth of the octrees built by [`CollisionWorld::insert`](crate::world::CollisionWorld::insert).
    pub octree_depth: u32,

    /// Requested depths above this are clamped. Values above
    /// [`MAX_OCTREE_DEPTH`](crate::tree::MAX_OCTREE_DEPTH) make
    /// [`CollisionWorld::insert`](crate::world::CollisionWorld::insert) fail.
    pub max_octree_depth: u32,

    /// Whether the collision loop runs at all.
    pub active: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            octree_depth: DEFAULT_OCTREE_DEPTH,
            max_octree_depth: DEFAULT_MAX_OCTREE_DEPTH,
            active: true,
        }
    }
}

impl CollisionConfig {
    /// `depth` clamped to [`max_octree_depth`](CollisionConfig::max_octree_depth).
    pub fn effective_depth(&self, depth: u32) -> u32 {
        if depth > self.max_octree_depth {
            log::warn!(
                "Octree depth {depth} exceeds the maximum of {}, clamping",
                self.max_octree_depth
            );
            self.max_octree_depth
        } else {
            depth
        }
    }
}
