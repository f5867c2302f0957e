//! The node arena and its primitive accessors.

use std::collections::HashMap;

use crate::{DomError, DomResult, ElementData, Node, NodeId, NodeKind, NodeType};

/// Arena-based DOM tree with O(1) node access.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
///
/// One arena may hold several documents and any number of detached nodes.
/// Nodes are never freed: unlinking a node leaves it addressable by its
/// [`NodeId`] so it can be inserted again.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The initial Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,

    /// Document fragment to host element associations.
    ///
    /// Kept outside the parent/child graph so that ordinary ancestor walks
    /// never cross a host boundary.
    pub(crate) hosts: HashMap<NodeId, NodeId>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeType::Document, None)],
            hosts: HashMap::new(),
        }
    }

    /// Get the initial document node ID.
    #[must_use]
    pub const fn document(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node owned by the initial document and return its ID.
    /// The node is not yet attached to the tree.
    ///
    /// Allocating a [`NodeType::Document`] creates a new, separate document.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let owner = match node_type {
            NodeType::Document => None,
            _ => Some(NodeId::ROOT),
        };
        self.push(Node::new(node_type, owner))
    }

    /// Allocate a new, detached node whose node document is that of `document`.
    ///
    /// `document` may be any node; its node document is used.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotFound`] if `document` is not in the arena.
    pub fn alloc_in(&mut self, document: NodeId, node_type: NodeType) -> DomResult<NodeId> {
        let owner = self
            .node_document(document)
            .ok_or(DomError::NotFound("owner document is not in the tree"))?;
        let owner = match node_type {
            NodeType::Document => None,
            _ => Some(owner),
        };
        Ok(self.push(Node::new(node_type, owner)))
    }

    /// [§ 4.5 createDocument](https://dom.spec.whatwg.org/#dom-domimplementation-createdocument)
    ///
    /// Create a new, empty document in this arena.
    pub fn create_document(&mut self) -> NodeId {
        self.alloc(NodeType::Document)
    }

    /// Create a detached element owned by the initial document.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData {
            tag_name: tag_name.to_string(),
        }))
    }

    /// Create a detached text node owned by the initial document.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(NodeType::text(data))
    }

    /// Create an empty document fragment owned by the initial document.
    pub fn create_document_fragment(&mut self) -> NodeId {
        self.alloc(NodeType::DocumentFragment)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// The kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    /// Whether `id` names a node of the given kind.
    #[must_use]
    pub fn is_kind(&self, id: NodeId, kind: NodeKind) -> bool {
        self.kind(id) == Some(kind)
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    ///
    /// "An object A's next sibling is the object immediately following A
    /// in the children of A's parent." O(children of the parent).
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(parent, id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    ///
    /// "An object A's previous sibling is the object immediately preceding A
    /// in the children of A's parent." O(children of the parent).
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(parent, id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Position of `node` among the children of `parent`, by identity.
    ///
    /// A linear scan: O(children). Returns `None` when `node` is not a child
    /// of `parent`.
    #[must_use]
    pub fn index_of(&self, parent: NodeId, node: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&child| child == node)
    }

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-index)
    ///
    /// "The index of an object is its number of preceding siblings, or 0 if
    /// it has none." Returns `None` for a node without a parent.
    #[must_use]
    pub fn index(&self, id: NodeId) -> Option<usize> {
        self.index_of(self.parent(id)?, id)
    }

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-root)
    ///
    /// "The root of an object is itself, if its parent is null, or else it is
    /// the root of its parent." O(depth).
    #[must_use]
    pub fn root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// The document that owns `id`; `None` for documents and unknown IDs.
    #[must_use]
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.owner)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-node-document)
    ///
    /// The node document of `id`: the node itself for a document, otherwise
    /// its owner.
    #[must_use]
    pub fn node_document(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        match node.node_type {
            NodeType::Document => Some(id),
            _ => node.owner,
        }
    }

    /// Whether `id` refuses child-list mutation.
    #[must_use]
    pub fn is_read_only(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_read_only)
    }

    /// Mark a node as refusing (or accepting) child-list mutation.
    ///
    /// Mutations targeting a read-only parent fail with
    /// [`DomError::NotSupported`].
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotFound`] if `id` is not in the arena.
    pub fn set_read_only(&mut self, id: NodeId, read_only: bool) -> DomResult<()> {
        let node = self
            .get_mut(id)
            .ok_or(DomError::NotFound("node is not in the tree"))?;
        node.read_only = read_only;
        Ok(())
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) | NodeType::CdataSection(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#document-element)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self, document: NodeId) -> Option<NodeId> {
        self.find_child(document, |n| n.kind() == NodeKind::Element)
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-doctype)
    ///
    /// "The doctype getter steps are to return the child of this that is a
    /// doctype; otherwise null."
    #[must_use]
    pub fn doctype(&self, document: NodeId) -> Option<NodeId> {
        self.find_child(document, |n| n.kind() == NodeKind::DocumentType)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
