use core::fmt;

use crate::{
    bounding::{Aabb, Float, TVec3},
    NodeId,
};

/// Single cell of an [`Octree`](crate::tree::Octree).
///
/// `aabb` holds construction-time local bounds; world placement is applied
/// as an offset at query time.
#[derive(Clone, Copy, Debug)]
pub struct Node<F: Float> {
    pub aabb: Aabb<F>,
    pub ntype: NodeType,
    pub parent: Option<NodeId>,
    /// Levels remaining below this node.
    pub depth: u32,
    /// `true` if at least one mesh vertex was routed into this node.
    ///
    /// A vertex is routed into a single child, see [`Branch::find_child`].
    /// A vertex lying on a split plane therefore tags only the upper octant,
    /// even though the neighbouring octants contain it too.
    pub has_mesh_vertex: bool,
}

impl<F: Float> Default for Node<F> {
    fn default() -> Self {
        Node {
            aabb: Aabb::<F>::default(),
            ntype: Default::default(),
            parent: Default::default(),
            depth: 0,
            has_mesh_vertex: false,
        }
    }
}

impl<F: Float> Node<F> {
    pub(crate) fn from_aabb(aabb: Aabb<F>, depth: u32, parent: Option<NodeId>) -> Self {
        Node {
            aabb,
            depth,
            parent,
            ..Default::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.ntype, NodeType::Leaf)
    }

    /// Closed containment test against the node's local bounds.
    pub fn contains(&self, point: TVec3<F>) -> bool {
        self.aabb.contains(point)
    }

    /// Node bounds placed at `offset`.
    pub fn world_aabb(&self, offset: TVec3<F>) -> Aabb<F> {
        self.aabb.translated(offset)
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeType {
    #[default]
    Leaf,
    Branch(Branch),
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Leaf => write!(f, "NodeType: Leaf"),
            NodeType::Branch(branch) => write!(f, "NodeType: Branch({:?})", branch),
        }
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Branch {
    pub children: [NodeId; 8],
}

impl Branch {
    pub(crate) fn new(children: [NodeId; 8]) -> Self {
        Branch { children }
    }

    /// Child owning `position`.
    ///
    /// A coordinate equal to the center goes to the upper half, so every
    /// point belongs to exactly one child.
    pub fn find_child<F: Float>(&self, position: TVec3<F>, center: TVec3<F>) -> NodeId {
        let x = if position.x < center.x { 0 } else { 1 };
        let y = if position.y < center.y { 0 } else { 1 };
        let z = if position.z < center.z { 0 } else { 1 };

        let idx = x | y << 1 | z << 2;

        self.children[idx]
    }
}
