//! Iterative tree traversal.
//!
//! Every walk here uses an explicit stack or a parent-link loop, never call
//! stack recursion, so tree depth is bounded by heap memory only.

use crate::{DomTree, Node, NodeId};

impl DomTree {
    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-inclusive-descendant)
    ///
    /// `root` followed by all of its descendants, in tree order (pre-order,
    /// children left to right).
    ///
    /// The iterator is lazy and single-pass; call again to restart.
    #[must_use]
    pub fn descendants_and_self(&self, root: NodeId) -> Descendants<'_> {
        let stack = if self.get(root).is_some() {
            vec![root]
        } else {
            Vec::new()
        };
        Descendants { tree: self, stack }
    }

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    ///
    /// All descendants of `root` in tree order, excluding `root` itself.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.children(root).iter().rev().copied().collect(),
        }
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-inclusive-ancestor)
    ///
    /// "An inclusive ancestor is an object or one of its ancestors."
    /// Yields `id` first, then its ancestors up to the root.
    #[must_use]
    pub fn inclusive_ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.get(id).map(|_| id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let before = self
            .parent(id)
            .and_then(|parent| {
                let index = self.index_of(parent, id)?;
                Some(&self.children(parent)[..index])
            })
            .unwrap_or(&[]);
        before.iter().rev().copied()
    }

    /// Iterate over following siblings (from immediately after to last child).
    pub fn following_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let after = self
            .parent(id)
            .and_then(|parent| {
                let index = self.index_of(parent, id)?;
                Some(&self.children(parent)[index + 1..])
            })
            .unwrap_or(&[]);
        after.iter().copied()
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-inclusive-descendant)
    ///
    /// "An inclusive descendant is an object or one of its descendants."
    #[must_use]
    pub fn is_inclusive_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        descendant == ancestor || self.is_descendant_of(descendant, ancestor)
    }

    /// Check if `ancestor` is an ancestor of `node`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.is_descendant_of(node, ancestor)
    }

    /// Check if `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inclusive_ancestors(node).any(|id| id == ancestor)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-contains)
    ///
    /// "The contains(other) method steps are to return true if other is an
    /// inclusive descendant of this; otherwise false."
    #[must_use]
    pub fn contains(&self, node: NodeId, other: NodeId) -> bool {
        self.is_inclusive_ancestor_of(node, other)
    }

    /// Whether `a` and `b` are distinct nodes sharing a parent.
    #[must_use]
    pub fn is_sibling_of(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.parent(a).is_some() && self.parent(a) == self.parent(b)
    }

    /// First direct child of `parent` matching `predicate`.
    pub fn find_child(
        &self,
        parent: NodeId,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.get(id).is_some_and(&mut predicate))
    }

    /// First descendant of `parent`, in tree order, matching `predicate`.
    ///
    /// The search looks at most `max_depth` levels below the direct children:
    /// with `max_depth == 0` it is exactly [`DomTree::find_child`]. A match
    /// deeper than the bound is never reported, even if one exists.
    /// [`crate::DEFAULT_MAX_DEPTH`] is the usual bound.
    pub fn find_descendant(
        &self,
        parent: NodeId,
        mut predicate: impl FnMut(&Node) -> bool,
        max_depth: usize,
    ) -> Option<NodeId> {
        // (node, levels below the direct children)
        let mut stack: Vec<(NodeId, usize)> = self
            .children(parent)
            .iter()
            .rev()
            .map(|&child| (child, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if predicate(node) {
                return Some(id);
            }
            if depth < max_depth {
                stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
        None
    }
}

/// Pre-order iterator over a subtree, backed by an explicit LIFO stack.
///
/// The iterator borrows the tree, so the subtree cannot be mutated while it
/// is being walked.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev());
        Some(id)
    }
}

/// Iterator over ancestors of a node.
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::{DomTree, NodeId, NodeKind};

    fn build(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
        let id = tree.create_element(tag);
        let _ = tree.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_descendants_of_leaf_is_empty() {
        let mut tree = DomTree::new();
        let leaf = tree.create_text("x");
        assert_eq!(tree.descendants(leaf).count(), 0);
        assert_eq!(tree.descendants_and_self(leaf).collect::<Vec<_>>(), vec![leaf]);
    }

    #[test]
    fn test_unknown_id_yields_nothing() {
        let tree = DomTree::new();
        assert_eq!(tree.descendants_and_self(NodeId(7)).count(), 0);
        assert_eq!(tree.inclusive_ancestors(NodeId(7)).count(), 0);
    }

    #[test]
    fn test_sibling_iterators() {
        let mut tree = DomTree::new();
        let html = build(&mut tree, NodeId::ROOT, "html");
        let a = build(&mut tree, html, "a");
        let b = build(&mut tree, html, "b");
        let c = build(&mut tree, html, "c");

        assert_eq!(tree.preceding_siblings(c).collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(tree.following_siblings(a).collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(tree.following_siblings(c).count(), 0);
        assert!(tree.is_sibling_of(a, c));
        assert!(!tree.is_sibling_of(a, a));
        assert!(!tree.is_sibling_of(a, html));
    }

    #[test]
    fn test_find_descendant_prefers_tree_order() {
        let mut tree = DomTree::new();
        let html = build(&mut tree, NodeId::ROOT, "html");
        let first = build(&mut tree, html, "div");
        let deep = build(&mut tree, first, "span");
        let _second = build(&mut tree, html, "span");

        let found = tree.find_descendant(
            html,
            |n| n.kind() == NodeKind::Element && tag_of(n) == "span",
            crate::DEFAULT_MAX_DEPTH,
        );
        assert_eq!(found, Some(deep));
    }

    fn tag_of(node: &crate::Node) -> &str {
        match &node.node_type {
            crate::NodeType::Element(data) => &data.tag_name,
            _ => "",
        }
    }
}
