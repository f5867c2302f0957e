//! Tree-order comparison between arbitrary nodes.
//!
//! [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-order)
//!
//! "In tree order is preorder, depth-first traversal of a tree."
//!
//! No global order index is maintained. Two nodes are compared by walking
//! their ancestor chains, which costs O(depth + children at the divergence
//! point).

use std::cmp::Ordering;

use crate::{DomTree, NodeId};

impl DomTree {
    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-preceding)
    ///
    /// "An object A is preceding an object B if A and B are in the same tree
    /// and A comes before B in tree order."
    ///
    /// Nodes in unrelated trees have no decidable order; for them this returns
    /// `false`, which must not be read as "equal" or "follows". Use
    /// [`DomTree::compare_tree_order`] to tell the cases apart.
    #[must_use]
    pub fn precedes(&self, before: NodeId, after: NodeId) -> bool {
        self.compare_tree_order(before, after) == Some(Ordering::Less)
    }

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-following)
    ///
    /// "An object A is following an object B if A and B are in the same tree
    /// and A comes after B in tree order." Defined as `precedes(b, a)`.
    #[must_use]
    pub fn follows(&self, after: NodeId, before: NodeId) -> bool {
        self.precedes(before, after)
    }

    /// Relative tree order of `a` and `b`.
    ///
    /// `Less` if `a` precedes `b`, `Greater` if it follows, `Equal` for the
    /// same node, and `None` when the nodes do not share a root.
    #[must_use]
    pub fn compare_tree_order(&self, a: NodeId, b: NodeId) -> Option<Ordering> {
        if a == b {
            return self.get(a).map(|_| Ordering::Equal);
        }

        // Node first, root last.
        let a_chain: Vec<NodeId> = self.inclusive_ancestors(a).collect();
        let b_chain: Vec<NodeId> = self.inclusive_ancestors(b).collect();
        let mut a_rest = a_chain.as_slice();
        let mut b_rest = b_chain.as_slice();

        // Drop the deepest entries of the longer chain until both chains
        // start at the same depth. If they now start at the same node, the
        // deeper input is a descendant of the other and follows it.
        let depth_order = a_rest.len().cmp(&b_rest.len());
        match depth_order {
            Ordering::Less => b_rest = &b_rest[b_rest.len() - a_rest.len()..],
            Ordering::Greater => a_rest = &a_rest[a_rest.len() - b_rest.len()..],
            Ordering::Equal => {}
        }
        if depth_order != Ordering::Equal && a_rest.first() == b_rest.first() {
            return Some(depth_order);
        }

        // Walk both chains upward in lockstep until the next entries are the
        // same node: the current entries are then siblings under it.
        while let (Some((&a_head, a_tail)), Some((&b_head, b_tail))) =
            (a_rest.split_first(), b_rest.split_first())
        {
            if let (Some(&a_parent), Some(&b_parent)) = (a_tail.first(), b_tail.first())
                && a_parent == b_parent
            {
                return Some(
                    self.index_of(a_parent, a_head)
                        .cmp(&self.index_of(b_parent, b_head)),
                );
            }
            a_rest = a_tail;
            b_rest = b_tail;
        }

        None
    }
}
