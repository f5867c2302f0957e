//! JSON tree fixtures.
//!
//! A fixture lists detached roots; every child is attached through
//! [`DomTree::append_child`], so a fixture that violates a hierarchy rule
//! fails to load with the same error the library would report.
//!
//! ```json
//! { "roots": [
//!     { "kind": "document", "label": "doc", "children": [
//!         { "kind": "doctype", "name": "html" },
//!         { "kind": "element", "tag": "html", "label": "html" }
//!     ] },
//!     { "kind": "document-fragment", "label": "frag", "host": "html" }
//! ] }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use sylva_dom::{DoctypeData, DomTree, ElementData, NodeId, NodeType, ProcessingInstructionData};

#[derive(Debug, Deserialize)]
struct FixtureFile {
    roots: Vec<NodeSpec>,
}

/// One node of a fixture and its subtree.
#[derive(Debug, Deserialize)]
struct NodeSpec {
    #[serde(flatten)]
    payload: Payload,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    children: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum Payload {
    Document,
    DocumentFragment {
        #[serde(default)]
        host: Option<String>,
    },
    Doctype {
        name: String,
    },
    Element {
        tag: String,
    },
    Text {
        data: String,
    },
    CdataSection {
        data: String,
    },
    Comment {
        data: String,
    },
    ProcessingInstruction {
        target: String,
        #[serde(default)]
        data: String,
    },
}

impl Payload {
    fn into_node_type(self) -> NodeType {
        match self {
            Self::Document => NodeType::Document,
            Self::DocumentFragment { .. } => NodeType::DocumentFragment,
            Self::Doctype { name } => NodeType::DocumentType(DoctypeData { name }),
            Self::Element { tag } => NodeType::Element(ElementData { tag_name: tag }),
            Self::Text { data } => NodeType::Text(data),
            Self::CdataSection { data } => NodeType::CdataSection(data),
            Self::Comment { data } => NodeType::Comment(data),
            Self::ProcessingInstruction { target, data } => {
                NodeType::ProcessingInstruction(ProcessingInstructionData { target, data })
            }
        }
    }
}

/// A tree built from a fixture, with its labels.
#[derive(Debug)]
pub struct Fixture {
    /// The arena holding every fixture node.
    pub tree: DomTree,
    /// The top-level nodes, in fixture order.
    pub roots: Vec<NodeId>,
    labels: HashMap<String, NodeId>,
    names: HashMap<NodeId, String>,
}

impl Fixture {
    /// Read and build the fixture at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid fixture {}", path.display()))
    }

    /// Build a fixture from its JSON text.
    ///
    /// The first top-level `document` becomes the arena's initial document;
    /// further ones are separate documents.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: FixtureFile = serde_json::from_str(json)?;
        let mut builder = Builder {
            fixture: Self {
                tree: DomTree::new(),
                roots: Vec::new(),
                labels: HashMap::new(),
                names: HashMap::new(),
            },
            hosts: Vec::new(),
            initial_document_used: false,
        };

        for spec in file.roots {
            let id = builder.build_root(spec)?;
            builder.fixture.roots.push(id);
        }

        let Builder {
            mut fixture, hosts, ..
        } = builder;
        for (fragment, label) in hosts {
            let host = fixture.resolve(&label)?;
            fixture
                .tree
                .set_host(fragment, host)
                .with_context(|| format!("cannot make `{label}` a host"))?;
        }
        tracing::debug!(
            nodes = fixture.tree.len(),
            roots = fixture.roots.len(),
            "fixture built"
        );
        Ok(fixture)
    }

    /// Resolve a node reference: a label, or a raw id written `#N`.
    pub fn resolve(&self, reference: &str) -> Result<NodeId> {
        if let Some(&id) = self.labels.get(reference) {
            return Ok(id);
        }
        if let Some(index) = reference.strip_prefix('#')
            && let Ok(index) = index.parse::<usize>()
            && index < self.tree.len()
        {
            return Ok(NodeId(index));
        }
        bail!("no node labelled `{reference}`")
    }

    /// The label given to `id`, if any.
    pub fn label_of(&self, id: NodeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

struct Builder {
    fixture: Fixture,
    /// Fragment host associations, resolved once every label exists.
    hosts: Vec<(NodeId, String)>,
    initial_document_used: bool,
}

impl Builder {
    fn build_root(&mut self, spec: NodeSpec) -> Result<NodeId> {
        if matches!(spec.payload, Payload::Document) && !self.initial_document_used {
            self.initial_document_used = true;
            return self.attach(NodeId::ROOT, spec.label, spec.children);
        }
        self.build(NodeId::ROOT, spec)
    }

    /// Allocate `spec` in `document`, then build and append its children.
    fn build(&mut self, document: NodeId, spec: NodeSpec) -> Result<NodeId> {
        let NodeSpec {
            payload,
            label,
            children,
        } = spec;
        let tree = &mut self.fixture.tree;
        let id = match payload {
            Payload::Document => tree.create_document(),
            Payload::DocumentFragment { host } => {
                let id = tree.alloc_in(document, NodeType::DocumentFragment)?;
                if let Some(host) = host {
                    self.hosts.push((id, host));
                }
                id
            }
            payload => tree.alloc_in(document, payload.into_node_type())?,
        };
        self.attach(id, label, children)
    }

    /// Label an allocated node and append its children.
    fn attach(
        &mut self,
        id: NodeId,
        label: Option<String>,
        children: Vec<NodeSpec>,
    ) -> Result<NodeId> {
        if let Some(label) = label {
            if self.fixture.labels.contains_key(&label) {
                bail!("duplicate label `{label}`");
            }
            let _ = self.fixture.names.insert(id, label.clone());
            let _ = self.fixture.labels.insert(label, id);
        }

        let document = self.fixture.tree.node_document(id).unwrap_or(NodeId::ROOT);
        for child in children {
            let child_id = self.build(document, child)?;
            let _ = self
                .fixture
                .tree
                .append_child(id, child_id)
                .with_context(|| format!("cannot append {child_id} to {id}"))?;
        }
        Ok(id)
    }
}
