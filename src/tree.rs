use std::ops::ControlFlow;

use smallvec::{smallvec, SmallVec};

use crate::{
    bounding::{Aabb, Float, TVec3},
    node::{Branch, Node, NodeType},
    pool::Pool,
    NodeId,
};

/// Nodes preallocated for a tree regardless of its depth.
const MAX_PREALLOCATED_NODES: usize = 1 << 16;

/// Deepest tree whose nodes are all addressable by a [`NodeId`].
pub const MAX_OCTREE_DEPTH: u32 = 10;

/// Fully subdivided octree over a fixed box.
///
/// Every node knows whether a mesh vertex fell into it, which lets
/// [`check_collision`](Octree::check_collision) skip empty space.
#[derive(Clone, Debug)]
pub struct Octree<F: Float> {
    pub nodes: Pool<Node<F>>,
    pub root: NodeId,
}

impl<F: Float> Octree<F> {
    /// Creates a tree over `aabb` subdivided `depth` levels down.
    ///
    /// No node is tagged with a mesh vertex yet,
    /// see [`init_mesh_vertex_info`](Octree::init_mesh_vertex_info).
    ///
    /// `depth` is clamped to [`MAX_OCTREE_DEPTH`].
    pub fn from_aabb(aabb: Aabb<F>, depth: u32) -> Self {
        let depth = clamp_depth(depth);
        let mut nodes = Pool::with_capacity(node_count(depth).min(MAX_PREALLOCATED_NODES));
        let root = nodes.insert(Node::from_aabb(aabb, depth, None));
        let mut tree = Octree { nodes, root };
        tree.subdivide(root, depth);
        tree
    }

    /// Creates a subdivided tree over `aabb` and tags it with `points`.
    pub fn build(aabb: Aabb<F>, depth: u32, points: &[TVec3<F>]) -> Self {
        let mut tree = Self::from_aabb(aabb, depth);
        tree.init_mesh_vertex_info(points);
        tree
    }

    /// Splits `node` into 8 octants and keeps splitting until `depth` levels
    /// exist below it. With `depth == 0` the node stays a leaf.
    ///
    /// `depth` is clamped to [`MAX_OCTREE_DEPTH`].
    pub fn subdivide(&mut self, node: NodeId, depth: u32) {
        let depth = clamp_depth(depth);
        let mut stack: SmallVec<[(NodeId, u32); 32]> = smallvec![(node, depth)];
        while let Some((node, depth)) = stack.pop() {
            self.nodes[node].depth = self.nodes[node].depth.max(depth);
            if depth == 0 {
                continue;
            }

            let children = match self.nodes[node].ntype {
                NodeType::Branch(Branch { children }) => children,
                NodeType::Leaf => {
                    let children = self.nodes.branch(node, depth - 1);
                    self.nodes[node].ntype = NodeType::Branch(Branch::new(children));
                    children
                }
            };
            stack.extend(children.into_iter().map(|child| (child, depth - 1)));
        }
    }

    /// Tags every node that holds at least one of `points`.
    ///
    /// Each point is routed from the root to exactly one leaf, marking the
    /// leaf and all of its ancestors. Points outside the root box are ignored.
    /// Previous tags are cleared.
    pub fn init_mesh_vertex_info(&mut self, points: &[TVec3<F>]) {
        for node in self.nodes.iter_mut() {
            node.has_mesh_vertex = false;
        }

        let bounds = self.nodes[self.root].aabb;
        for &point in points.iter().filter(|p| bounds.contains(**p)) {
            let mut current = self.root;
            loop {
                let n = &mut self.nodes[current];
                n.has_mesh_vertex = true;
                match n.ntype {
                    NodeType::Leaf => break,
                    NodeType::Branch(branch) => {
                        current = branch.find_child(point, n.aabb.center());
                    }
                }
            }
        }
    }

    /// Finds the leaf a `point` is routed to.
    ///
    /// Returns [`None`] if the point lies outside the root box.
    pub fn find_leaf(&self, point: TVec3<F>) -> Option<NodeId> {
        if !self.nodes[self.root].contains(point) {
            return None;
        }

        let mut current = self.root;
        while let NodeType::Branch(branch) = self.nodes[current].ntype {
            current = branch.find_child(point, self.nodes[current].aabb.center());
        }
        Some(current)
    }

    /// Collects every pair of overlapping leaves `(self leaf, other leaf)`
    /// with both trees placed at their offsets.
    ///
    /// Subtrees without mesh vertices are never visited.
    pub fn check_collision(
        &self,
        other: &Octree<F>,
        self_offset: TVec3<F>,
        other_offset: TVec3<F>,
    ) -> Vec<(NodeId, NodeId)> {
        let mut leaves = Vec::new();
        let _ = self.visit_collisions(other, self_offset, other_offset, |a, b| {
            leaves.push((a, b));
            ControlFlow::Continue(())
        });
        leaves
    }

    /// Same as [`check_collision`](Octree::check_collision) but stops
    /// at the first overlapping pair of leaves.
    pub fn intersects(
        &self,
        other: &Octree<F>,
        self_offset: TVec3<F>,
        other_offset: TVec3<F>,
    ) -> bool {
        self.visit_collisions(other, self_offset, other_offset, |_, _| ControlFlow::Break(()))
            .is_break()
    }

    fn visit_collisions<V>(
        &self,
        other: &Octree<F>,
        self_offset: TVec3<F>,
        other_offset: TVec3<F>,
        mut visit: V,
    ) -> ControlFlow<()>
    where
        V: FnMut(NodeId, NodeId) -> ControlFlow<()>,
    {
        let mut stack: SmallVec<[(NodeId, NodeId); 64]> = smallvec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            let na = &self.nodes[a];
            let nb = &other.nodes[b];

            if !na.has_mesh_vertex || !nb.has_mesh_vertex {
                continue;
            }

            if !na.world_aabb(self_offset).overlaps(&nb.world_aabb(other_offset)) {
                continue;
            }

            match (na.ntype, nb.ntype) {
                (NodeType::Leaf, NodeType::Leaf) => visit(a, b)?,

                (NodeType::Branch(branch), NodeType::Leaf) => {
                    for &child in branch.children.iter().rev() {
                        if self.nodes[child].has_mesh_vertex {
                            stack.push((child, b));
                        }
                    }
                }

                (NodeType::Leaf, NodeType::Branch(branch)) => {
                    for &child in branch.children.iter().rev() {
                        if other.nodes[child].has_mesh_vertex {
                            stack.push((a, child));
                        }
                    }
                }

                (NodeType::Branch(ba), NodeType::Branch(bb)) => {
                    for &ca in ba.children.iter().rev() {
                        if !self.nodes[ca].has_mesh_vertex {
                            continue;
                        }
                        for &cb in bb.children.iter().rev() {
                            if other.nodes[cb].has_mesh_vertex {
                                stack.push((ca, cb));
                            }
                        }
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Ids of all leaves.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter_elements::<NodeId>()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
    }

    /// Levels below the root.
    pub fn depth(&self) -> u32 {
        self.nodes[self.root].depth
    }

    /// Local bounds of the root.
    pub fn aabb(&self) -> Aabb<F> {
        self.nodes[self.root].aabb
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn clamp_depth(depth: u32) -> u32 {
    if depth > MAX_OCTREE_DEPTH {
        log::warn!("Octree depth {depth} exceeds the maximum of {MAX_OCTREE_DEPTH}, clamping");
        MAX_OCTREE_DEPTH
    } else {
        depth
    }
}

/// Number of nodes in a tree fully subdivided `depth` levels down.
pub(crate) fn node_count(depth: u32) -> usize {
    8usize
        .checked_pow(depth.saturating_add(1))
        .map(|n| (n - 1) / 7)
        .unwrap_or(usize::MAX)
}
