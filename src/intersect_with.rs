//! Helper functions with a custom intersection closure.

use heapless::Vec as HVec;

use crate::{
    bounding::{Aabb, Float, TVec3},
    node::NodeType,
    tree::Octree,
    NodeId,
};

impl<F: Float> Octree<F> {
    /// Intersect [`Octree`] placed at `offset` with a custom intersection closure.
    ///
    /// Returns the [`vector`](Vec) of leaves holding a mesh vertex
    /// whose world box satisfies `what`.
    ///
    /// ```rust
    /// use okcollide::prelude::*;
    ///
    /// let points = [TVec3::splat(0.0f32), TVec3::splat(1.0)];
    /// let tree = Octree::build(Aabb::from_points(&points).unwrap(), 1, &points);
    ///
    /// let region = Aabb::from_min_max(TVec3::splat(9.0), TVec3::splat(10.0));
    /// let offset = TVec3::splat(10.0);
    /// let leaves = tree.intersect_with(offset, |aabb| aabb.overlaps(&region));
    /// assert_eq!(leaves, vec![tree.find_leaf(TVec3::splat(0.0)).unwrap()]);
    /// ```
    pub fn intersect_with<P>(&self, offset: TVec3<F>, what: P) -> Vec<NodeId>
    where
        P: Fn(&Aabb<F>) -> bool,
    {
        let mut leaves = Vec::with_capacity(10);
        self.rintersect_with(self.root, offset, &what, &mut |leaf| leaves.push(leaf));
        leaves
    }

    /// Intersect [`Octree`] placed at `offset` with a custom intersection closure.
    /// Each matching leaf is passed to `actor` together with its world box,
    /// nothing is allocated.
    ///
    /// ```rust
    /// use okcollide::prelude::*;
    ///
    /// let points = [TVec3::splat(0.0f32), TVec3::splat(1.0)];
    /// let tree = Octree::build(Aabb::from_points(&points).unwrap(), 2, &points);
    ///
    /// let mut boxes = Vec::new();
    /// tree.intersect_with_for_each(TVec3::zero(), |_| true, |_, aabb| boxes.push(aabb));
    /// assert_eq!(boxes.len(), 2);
    /// ```
    pub fn intersect_with_for_each<P, A>(&self, offset: TVec3<F>, what: P, mut actor: A)
    where
        P: Fn(&Aabb<F>) -> bool,
        A: FnMut(NodeId, Aabb<F>),
    {
        self.rintersect_with(self.root, offset, &what, &mut |leaf| {
            actor(leaf, self.nodes[leaf].world_aabb(offset))
        });
    }

    fn rintersect_with<P, A>(&self, node: NodeId, offset: TVec3<F>, what: &P, actor: &mut A)
    where
        P: Fn(&Aabb<F>) -> bool,
        A: FnMut(NodeId),
    {
        // We use a heapless stack to loop through the nodes until we complete the intersect however
        // if the stack becomes full then we fallback on recursive calls.
        let mut stack = HVec::<NodeId, 32>::new();
        if stack.push(node).is_err() {
            return;
        }
        while let Some(node) = stack.pop() {
            let n = &self.nodes[node];
            if !n.has_mesh_vertex || !what(&n.world_aabb(offset)) {
                continue;
            }

            match n.ntype {
                NodeType::Leaf => actor(node),

                NodeType::Branch(branch) => {
                    let mut iter = branch.children.iter().rev();
                    while let Some(child) = iter.next() {
                        // If we can't push to the stack (to be processed on the next loop
                        // iteration) then we fallback to recursive calls.
                        if stack.push(*child).is_err() {
                            self.rintersect_with(*child, offset, what, actor);
                            for child in iter.by_ref() {
                                self.rintersect_with(*child, offset, what, actor);
                            }
                        }
                    }
                }
            }
        }
    }
}
