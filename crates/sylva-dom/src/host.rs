//! Fragment hosts and host-including ancestry.
//!
//! [§ 4.8 Interface DocumentFragment](https://dom.spec.whatwg.org/#concept-documentfragment-host)
//!
//! "A `DocumentFragment` node has an associated host (null or an element in a
//! different node tree)." Template contents and shadow roots use this
//! association. It is not a parent edge: the host lives in a different tree.

use std::collections::HashSet;

use crate::{DomError, DomResult, DomTree, NodeId, NodeKind};

impl DomTree {
    /// Associate `fragment` with the element `host`.
    ///
    /// Replaces any previous host of `fragment`.
    ///
    /// # Errors
    ///
    /// - [`DomError::NotFound`] if either node is not in the arena.
    /// - [`DomError::HierarchyRequest`] if `fragment` is not a document
    ///   fragment or `host` is not an element.
    pub fn set_host(&mut self, fragment: NodeId, host: NodeId) -> DomResult<()> {
        match (self.kind(fragment), self.kind(host)) {
            (None, _) | (_, None) => Err(DomError::NotFound("node is not in the tree")),
            (Some(NodeKind::DocumentFragment), Some(NodeKind::Element)) => {
                let _ = self.hosts.insert(fragment, host);
                Ok(())
            }
            (Some(NodeKind::DocumentFragment), Some(_)) => {
                Err(DomError::HierarchyRequest("a fragment host must be an element"))
            }
            (Some(_), Some(_)) => Err(DomError::HierarchyRequest(
                "only document fragments have a host",
            )),
        }
    }

    /// Remove the host association of `fragment`, returning the old host.
    pub fn clear_host(&mut self, fragment: NodeId) -> Option<NodeId> {
        self.hosts.remove(&fragment)
    }

    /// The host element of `fragment`, if it has one.
    #[must_use]
    pub fn host(&self, fragment: NodeId) -> Option<NodeId> {
        self.hosts.get(&fragment).copied()
    }

    /// [§ 4.2.2](https://dom.spec.whatwg.org/#concept-tree-host-including-inclusive-ancestor)
    ///
    /// "An object A is a host-including inclusive ancestor of an object B, if
    /// either A is an inclusive ancestor of B, or if B's root has a non-null
    /// host and A is a host-including inclusive ancestor of B's root's host."
    ///
    /// Host chains are followed in a loop. A chain that returns to a fragment
    /// already visited ends the search with `false`.
    #[must_use]
    pub fn is_host_including_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        let mut visited_roots = HashSet::new();
        loop {
            if self.is_inclusive_ancestor_of(ancestor, current) {
                return true;
            }
            let root = self.root(current);
            if !self.is_kind(root, NodeKind::DocumentFragment) {
                return false;
            }
            let Some(host) = self.host(root) else {
                return false;
            };
            if !visited_roots.insert(root) {
                return false;
            }
            current = host;
        }
    }
}
