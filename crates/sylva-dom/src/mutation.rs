//! [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#mutation-algorithms)
//!
//! Every public entry point runs all of its guard checks before touching the
//! tree. A call that returns an error has performed no mutation: no splice,
//! no removal from an old parent, no adoption.

use tracing::{debug, trace};

use crate::{DomError, DomResult, DomTree, NodeId, NodeKind};

/// Where a node is about to go, for the document-child rules.
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// Inserted before the given child, or appended.
    Before(Option<NodeId>),
    /// Replacing the given child.
    Replacing(NodeId),
}

impl DomTree {
    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// "To ensure pre-insertion validity of a node into a parent before a child"
    ///
    /// # Errors
    ///
    /// - [`DomError::HierarchyRequest`] if `parent` cannot have children, if
    ///   `node` is a host-including inclusive ancestor of `parent`, if `node`
    ///   is not an insertable kind, or if the insertion would break a
    ///   document's child constraints.
    /// - [`DomError::NotFound`] if `parent` or `node` is not in the arena, or
    ///   `child` is not a child of `parent`.
    pub fn ensure_pre_insertion_validity(
        &self,
        parent: NodeId,
        node: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<()> {
        self.ensure_validity(parent, node, Placement::Before(child))
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// "To pre-insert a node into a parent before a child"
    ///
    /// Inserting a node before itself leaves it where it is. A document
    /// fragment is replaced by its children, which are moved in order and
    /// leave the fragment empty. Returns `node`.
    ///
    /// # Errors
    ///
    /// Everything [`DomTree::ensure_pre_insertion_validity`] reports, and
    /// [`DomError::NotSupported`] if `parent`, the current parent of `node`,
    /// or `node` itself when it is a fragment is read-only.
    pub fn pre_insert(
        &mut self,
        parent: NodeId,
        node: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.ensure_pre_insertion_validity(parent, node, child)
            .inspect_err(|err| trace!(%parent, %node, ?child, %err, "pre-insertion rejected"))?;
        self.ensure_mutable(parent)?;
        self.ensure_detachable(node)?;

        // "Let referenceChild be child."
        // "If referenceChild is node, then set referenceChild to node's next sibling."
        let reference = if child == Some(node) {
            self.next_sibling(node)
        } else {
            child
        };

        let document = self
            .node_document(parent)
            .ok_or(DomError::NotFound("parent has no node document"))?;
        self.adopt(document, node);
        self.insert(parent, node, reference);

        debug!(%parent, %node, ?reference, "inserted node");
        Ok(node)
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-pre-remove)
    ///
    /// "To pre-remove a child from a parent". Returns `child`, now detached.
    ///
    /// # Errors
    ///
    /// - [`DomError::NotFound`] if `child` is not in the arena or its parent
    ///   is not `parent`.
    /// - [`DomError::NotSupported`] if `parent` is read-only.
    pub fn pre_remove(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        // "If child's parent is not parent, then throw a "NotFoundError" DOMException."
        if self.get(child).is_none() || self.parent(child) != Some(parent) {
            trace!(%parent, %child, "pre-removal rejected: not a child");
            return Err(DomError::NotFound("child is not a child of parent"));
        }
        self.ensure_mutable(parent)?;

        self.remove(child);
        debug!(%parent, %child, "removed node");
        Ok(child)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-appendchild)
    ///
    /// "The appendChild(node) method steps are to return the result of
    /// appending node to this." Appending is pre-inserting before null.
    ///
    /// # Errors
    ///
    /// See [`DomTree::pre_insert`].
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> DomResult<NodeId> {
        self.pre_insert(parent, node, None)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-insertbefore)
    ///
    /// "The insertBefore(node, child) method steps are to return the result
    /// of pre-inserting node into this before child."
    ///
    /// # Errors
    ///
    /// See [`DomTree::pre_insert`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.pre_insert(parent, node, child)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-removechild)
    ///
    /// "The removeChild(child) method steps are to return the result of
    /// pre-removing child from this."
    ///
    /// # Errors
    ///
    /// See [`DomTree::pre_remove`].
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.pre_remove(parent, child)
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-replace)
    ///
    /// "To replace a child with node within a parent". Returns the replaced
    /// `child`, now detached. Replacing a child with itself is a no-op.
    ///
    /// # Errors
    ///
    /// - [`DomError::HierarchyRequest`] under the same conditions as
    ///   pre-insertion, except that `child` itself does not count as an
    ///   existing document element or doctype.
    /// - [`DomError::NotFound`] if `child` is not a child of `parent`.
    /// - [`DomError::NotSupported`] if `parent`, the current parent of
    ///   `node`, or `node` itself when it is a fragment is read-only.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        node: NodeId,
        child: NodeId,
    ) -> DomResult<NodeId> {
        self.ensure_validity(parent, node, Placement::Replacing(child))
            .inspect_err(|err| trace!(%parent, %node, %child, %err, "replacement rejected"))?;
        self.ensure_mutable(parent)?;
        self.ensure_detachable(node)?;

        // "Let referenceChild be child's next sibling."
        // "If referenceChild is node, then set referenceChild to node's next sibling."
        let mut reference = self.next_sibling(child);
        if reference == Some(node) {
            reference = self.next_sibling(node);
        }

        let document = self
            .node_document(parent)
            .ok_or(DomError::NotFound("parent has no node document"))?;
        self.adopt(document, node);

        // Adoption already detached `child` when it is `node` itself.
        if self.parent(child) == Some(parent) {
            self.remove(child);
        }
        self.insert(parent, node, reference);

        debug!(%parent, %node, %child, "replaced node");
        Ok(child)
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-adoptnode)
    ///
    /// Move `node` and its subtree into `document`, detaching it from its
    /// current parent. Returns `node`.
    ///
    /// # Errors
    ///
    /// - [`DomError::NotFound`] if either node is not in the arena.
    /// - [`DomError::NotSupported`] if `node` is a document.
    /// - [`DomError::HierarchyRequest`] if `document` is not a document.
    pub fn adopt_node(&mut self, document: NodeId, node: NodeId) -> DomResult<NodeId> {
        match (self.kind(document), self.kind(node)) {
            (None, _) | (_, None) => return Err(DomError::NotFound("node is not in the tree")),
            (_, Some(NodeKind::Document)) => {
                return Err(DomError::NotSupported("documents cannot be adopted"));
            }
            (Some(kind), _) if kind != NodeKind::Document => {
                return Err(DomError::HierarchyRequest("adoption target is not a document"));
            }
            _ => {}
        }
        if let Some(parent) = self.parent(node) {
            self.ensure_mutable(parent)?;
        }

        self.adopt(document, node);
        debug!(%document, %node, "adopted node");
        Ok(node)
    }

    /// Number of element children of `node`.
    #[must_use]
    pub fn element_count(&self, node: NodeId) -> usize {
        self.children(node)
            .iter()
            .filter(|&&id| self.is_kind(id, NodeKind::Element))
            .count()
    }

    /// Whether `node` has a `Text` (or CDATA section) child.
    #[must_use]
    pub fn has_text_nodes(&self, node: NodeId) -> bool {
        self.children(node)
            .iter()
            .any(|&id| self.kind(id).is_some_and(NodeKind::is_text))
    }

    /// Whether a doctype comes after `child` among its siblings.
    #[must_use]
    pub fn is_followed_by_doctype(&self, child: NodeId) -> bool {
        self.following_siblings(child)
            .any(|id| self.is_kind(id, NodeKind::DocumentType))
    }

    /// Whether an element comes before `child` among its siblings.
    #[must_use]
    pub fn is_preceded_by_element(&self, child: NodeId) -> bool {
        self.preceding_siblings(child)
            .any(|id| self.is_kind(id, NodeKind::Element))
    }

    /// Shared guard sequence of pre-insert and replace.
    fn ensure_validity(
        &self,
        parent: NodeId,
        node: NodeId,
        placement: Placement,
    ) -> DomResult<()> {
        let parent_kind = self
            .kind(parent)
            .ok_or(DomError::NotFound("parent is not in the tree"))?;
        let node_kind = self
            .kind(node)
            .ok_or(DomError::NotFound("node is not in the tree"))?;

        // "If parent is not a Document, DocumentFragment, or Element node,
        // then throw a "HierarchyRequestError" DOMException."
        if parent_kind.is_endpoint() {
            return Err(DomError::HierarchyRequest("parent cannot have children"));
        }

        // "If node is a host-including inclusive ancestor of parent, then
        // throw a "HierarchyRequestError" DOMException."
        if self.is_host_including_inclusive_ancestor(node, parent) {
            return Err(DomError::HierarchyRequest(
                "node is a host-including inclusive ancestor of parent",
            ));
        }

        // "If child is non-null and its parent is not parent, then throw a
        // "NotFoundError" DOMException."
        let child = match placement {
            Placement::Before(child) => child,
            Placement::Replacing(child) => Some(child),
        };
        if let Some(child) = child
            && self.parent(child) != Some(parent)
        {
            return Err(DomError::NotFound("child is not a child of parent"));
        }

        // "If node is not a DocumentFragment, DocumentType, Element, or
        // CharacterData node, then throw a "HierarchyRequestError" DOMException."
        if !node_kind.is_insertable() {
            return Err(DomError::HierarchyRequest("node cannot be inserted"));
        }

        if parent_kind == NodeKind::Document {
            self.ensure_document_child_validity(parent, node, node_kind, placement)
        } else if node_kind == NodeKind::DocumentType {
            // "If either node is a Text node and parent is a document, or node
            // is a doctype and parent is not a document, then throw a
            // "HierarchyRequestError" DOMException."
            Err(DomError::HierarchyRequest(
                "doctypes can only be children of documents",
            ))
        } else {
            Ok(())
        }
    }

    /// The kind-specific rules for children of a document.
    fn ensure_document_child_validity(
        &self,
        document: NodeId,
        node: NodeId,
        node_kind: NodeKind,
        placement: Placement,
    ) -> DomResult<()> {
        // When replacing, the replaced child does not count as existing.
        let excluded = match placement {
            Placement::Before(_) => None,
            Placement::Replacing(child) => Some(child),
        };
        let has_other = |kind: NodeKind| {
            self.children(document)
                .iter()
                .any(|&id| Some(id) != excluded && self.is_kind(id, kind))
        };
        // A doctype at or after the insertion point (or after the replaced child).
        let doctype_after = match placement {
            Placement::Before(child) => child.is_some_and(|child| {
                self.is_kind(child, NodeKind::DocumentType) || self.is_followed_by_doctype(child)
            }),
            Placement::Replacing(child) => self.is_followed_by_doctype(child),
        };
        // An element before the insertion point (or before the replaced child).
        let element_before = match placement {
            Placement::Before(Some(child)) | Placement::Replacing(child) => {
                self.is_preceded_by_element(child)
            }
            // Appending lands after every existing element.
            Placement::Before(None) => has_other(NodeKind::Element),
        };

        match node_kind {
            NodeKind::DocumentFragment => {
                // "If node has more than one element child or has a Text node
                // child."
                let elements = self.element_count(node);
                if elements > 1 || self.has_text_nodes(node) {
                    return Err(DomError::HierarchyRequest(
                        "fragment would give the document text or several elements",
                    ));
                }
                // "Otherwise, if node has one element child and either parent
                // has an element child, child is a doctype, or child is
                // non-null and a doctype is following child."
                if elements == 1 && (has_other(NodeKind::Element) || doctype_after) {
                    return Err(DomError::HierarchyRequest(
                        "fragment element cannot become the document element here",
                    ));
                }
                Ok(())
            }
            NodeKind::Element => {
                // "parent has an element child, child is a doctype, or child is
                // non-null and a doctype is following child."
                if has_other(NodeKind::Element) {
                    return Err(DomError::HierarchyRequest(
                        "document already has a document element",
                    ));
                }
                if doctype_after {
                    return Err(DomError::HierarchyRequest(
                        "document element must follow the doctype",
                    ));
                }
                Ok(())
            }
            NodeKind::DocumentType => {
                // "parent has a doctype child, child is non-null and an element
                // is preceding child, or child is null and parent has an
                // element child."
                if has_other(NodeKind::DocumentType) {
                    return Err(DomError::HierarchyRequest("document already has a doctype"));
                }
                if element_before {
                    return Err(DomError::HierarchyRequest(
                        "doctype must precede the document element",
                    ));
                }
                Ok(())
            }
            NodeKind::Text | NodeKind::CdataSection => Err(DomError::HierarchyRequest(
                "documents cannot have text children",
            )),
            NodeKind::Comment | NodeKind::ProcessingInstruction => Ok(()),
            NodeKind::Document => Err(DomError::HierarchyRequest("node cannot be inserted")),
        }
    }

    fn ensure_mutable(&self, parent: NodeId) -> DomResult<()> {
        if self.is_read_only(parent) {
            trace!(%parent, "mutation of read-only node rejected");
            return Err(DomError::NotSupported("parent does not support mutation"));
        }
        Ok(())
    }

    /// Inserting `node` unlinks it from its current parent, and a fragment
    /// hands over its children. Both child lists must be mutable.
    fn ensure_detachable(&self, node: NodeId) -> DomResult<()> {
        if let Some(old_parent) = self.parent(node) {
            self.ensure_mutable(old_parent)?;
        }
        if self.is_kind(node, NodeKind::DocumentFragment) {
            self.ensure_mutable(node)?;
        }
        Ok(())
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#concept-node-adopt)
    ///
    /// Detach `node` from its parent, then give it and every inclusive
    /// descendant `document` as node document. The whole subtree is
    /// re-owned before the caller splices anything.
    fn adopt(&mut self, document: NodeId, node: NodeId) {
        if self.parent(node).is_some() {
            self.remove(node);
        }
        if self.owner_document(node) == Some(document) {
            return;
        }

        let subtree: Vec<NodeId> = self.descendants_and_self(node).collect();
        trace!(%document, %node, nodes = subtree.len(), "adopting subtree");
        for id in subtree {
            if let Some(entry) = self.get_mut(id) {
                entry.owner = Some(document);
            }
        }
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Splice `node` (or a fragment's children) into `parent` before
    /// `reference`, or at the end. `node` must already be detached.
    fn insert(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        let nodes = if self.is_kind(node, NodeKind::DocumentFragment) {
            self.get_mut(node)
                .map(|fragment| std::mem::take(&mut fragment.children))
                .unwrap_or_default()
        } else {
            vec![node]
        };

        for &id in &nodes {
            if let Some(entry) = self.get_mut(id) {
                entry.parent = Some(parent);
            }
        }

        let position = reference.and_then(|reference| self.index_of(parent, reference));
        if let Some(entry) = self.get_mut(parent) {
            let at = position.unwrap_or(entry.children.len());
            let _ = entry.children.splice(at..at, nodes);
        }
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Unlink `node` from its parent's children and clear its parent.
    fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(entry) = self.get_mut(parent) {
            entry.children.retain(|&id| id != node);
        }
        if let Some(entry) = self.get_mut(node) {
            entry.parent = None;
        }
    }
}
