//! Structural core of a DOM engine.
//!
//! This crate provides an arena-based DOM tree together with the tree
//! algorithms of the [DOM Living Standard](https://dom.spec.whatwg.org/):
//! traversal, tree-order comparison, host-including ancestry, and the
//! validated mutation algorithms (pre-insert, pre-remove, replace, adopt).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. A node's
//! parent is a plain index (a non-owning back-reference) and its children are
//! an ordered `Vec<NodeId>`.
//!
//! A document fragment's host is stored in a side table rather than as a
//! parent edge, so ordinary ancestor walks never cross it. Only
//! [`DomTree::is_host_including_inclusive_ancestor`] looks it up.
//!
//! Every traversal is iterative. Adversarially deep trees cannot exhaust the
//! call stack; the only unbounded resource is heap memory for the explicit
//! stacks.
//!
//! # Concurrency
//!
//! The tree is single-writer. Traversal iterators borrow the [`DomTree`]
//! immutably, so mutating a subtree while iterating it does not compile.

mod error;
mod host;
mod mutation;
mod node;
mod order;
mod traversal;
mod tree;

pub use error::{DomError, DomResult};
pub use node::{DoctypeData, ElementData, Node, NodeKind, NodeType, ProcessingInstructionData};
pub use traversal::{Ancestors, Descendants};
pub use tree::DomTree;

/// Default depth bound for [`DomTree::find_descendant`].
///
/// Searches never look deeper than this many levels below the starting node,
/// which caps the cost of a lookup on pathological trees.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
/// Identity, not structural equality, is what two `NodeId`s compare. Ids
/// carry no ordering: arena position says nothing about tree order, which
/// [`DomTree::compare_tree_order`] computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The initial document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
