//! Node storage and node kinds.

use strum_macros::{Display, EnumString};

use crate::NodeId;

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
/// "Each node has an associated node document... and parent (null or an object)."
///
/// The structural fields are private to the crate: parent and children are
/// only rewritten by the mutation algorithms, which keep them consistent.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub(crate) parent: Option<NodeId>,

    /// [§ 4.2](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "...and has children, which is an ordered set of objects."
    pub(crate) children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-node-document)
    /// "Each node has an associated node document, set upon creation, that is
    /// a document." `None` for documents, whose node document is themselves.
    pub(crate) owner: Option<NodeId>,

    /// Set for nodes that refuse mutation of their child list.
    pub(crate) read_only: bool,
}

impl Node {
    pub(crate) const fn new(node_type: NodeType, owner: Option<NodeId>) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            owner,
            read_only: false,
        }
    }

    /// The payload-free kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.node_type.kind()
    }

    /// The parent of this node, if it has one.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The children of this node, in tree order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The document that owns this node. `None` for documents.
    #[must_use]
    pub const fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Whether this node refuses child-list mutation.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type", together with the data that
/// node type carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    DocumentFragment,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    /// "Doctypes have an associated name, public ID, and system ID."
    DocumentType(DoctypeData),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
    /// [§ 4.12 Interface CDATASection](https://dom.spec.whatwg.org/#interface-cdatasection)
    CdataSection(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    /// "Comment nodes are known as comments."
    Comment(String),
    /// [§ 4.13 Interface ProcessingInstruction](https://dom.spec.whatwg.org/#interface-processinginstruction)
    ProcessingInstruction(ProcessingInstructionData),
}

impl NodeType {
    /// The payload-free kind of this node type.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Document => NodeKind::Document,
            Self::DocumentFragment => NodeKind::DocumentFragment,
            Self::DocumentType(_) => NodeKind::DocumentType,
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::CdataSection(_) => NodeKind::CdataSection,
            Self::Comment(_) => NodeKind::Comment,
            Self::ProcessingInstruction(_) => NodeKind::ProcessingInstruction,
        }
    }

    /// Shorthand for an element with the given local name.
    #[must_use]
    pub fn element(tag_name: &str) -> Self {
        Self::Element(ElementData {
            tag_name: tag_name.to_string(),
        })
    }

    /// Shorthand for a doctype with the given name.
    #[must_use]
    pub fn doctype(name: &str) -> Self {
        Self::DocumentType(DoctypeData {
            name: name.to_string(),
        })
    }

    /// Shorthand for a text node.
    #[must_use]
    pub fn text(data: &str) -> Self {
        Self::Text(data.to_string())
    }
}

/// The closed set of node kinds, without their data.
///
/// The tree algorithms branch on this tag only. Parsing accepts kebab-case
/// names, case-insensitively (`element`, `document-fragment`, `doctype`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum NodeKind {
    /// `DOCUMENT_NODE`
    Document,
    /// `DOCUMENT_FRAGMENT_NODE`
    DocumentFragment,
    /// `DOCUMENT_TYPE_NODE`
    #[strum(to_string = "document-type", serialize = "doctype")]
    DocumentType,
    /// `ELEMENT_NODE`
    Element,
    /// `TEXT_NODE`
    Text,
    /// `CDATA_SECTION_NODE`
    CdataSection,
    /// `COMMENT_NODE`
    Comment,
    /// `PROCESSING_INSTRUCTION_NODE`
    ProcessingInstruction,
}

impl NodeKind {
    /// Whether nodes of this kind can never have children.
    ///
    /// True for everything except documents, document fragments and elements.
    #[must_use]
    pub const fn is_endpoint(self) -> bool {
        !matches!(self, Self::Document | Self::DocumentFragment | Self::Element)
    }

    /// Whether nodes of this kind may be inserted as a child somewhere.
    ///
    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    /// "If node is not a DocumentFragment, DocumentType, Element, or
    /// CharacterData node, then throw a "HierarchyRequestError" DOMException."
    #[must_use]
    pub const fn is_insertable(self) -> bool {
        !matches!(self, Self::Document)
    }

    /// [§ 4.10 Interface CharacterData](https://dom.spec.whatwg.org/#interface-characterdata)
    #[must_use]
    pub const fn is_character_data(self) -> bool {
        matches!(
            self,
            Self::Text | Self::CdataSection | Self::Comment | Self::ProcessingInstruction
        )
    }

    /// Whether this kind is a `Text` node (`CDATASection` inherits from `Text`).
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text | Self::CdataSection)
    }
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "When an element is created, its local name is always given."
///
/// NOTE: Namespaces and attributes belong to the element layer, not the tree
/// core, so only the local name is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
}

/// Doctype-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctypeData {
    /// "Doctypes have an associated name"
    pub name: String,
}

/// Processing-instruction-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstructionData {
    /// "`ProcessingInstruction` nodes have an associated target."
    pub target: String,
    /// The instruction's character data.
    pub data: String,
}
