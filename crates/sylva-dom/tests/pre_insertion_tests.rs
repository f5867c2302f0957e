//! Tests for pre-insertion validity: cycles, host boundaries, node kinds, and
//! the document child rules.

use sylva_dom::{DomError, DomTree, NodeId, NodeType, ProcessingInstructionData};

fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::element(tag))
}

fn append(tree: &mut DomTree, parent: NodeId, child: NodeId) {
    let _ = tree.append_child(parent, child).unwrap();
}

fn assert_hierarchy_error(result: Result<NodeId, DomError>) {
    assert!(
        matches!(result, Err(DomError::HierarchyRequest(_))),
        "expected HierarchyRequest, got {result:?}"
    );
}

/// Document with `<!DOCTYPE html>` followed by `<html>`.
fn document_with_doctype_and_root(tree: &mut DomTree) -> (NodeId, NodeId) {
    let doctype = tree.alloc(NodeType::doctype("html"));
    let html = alloc_element(tree, "html");
    append(tree, NodeId::ROOT, doctype);
    append(tree, NodeId::ROOT, html);
    (doctype, html)
}

// ========== acyclicity ==========

#[test]
fn test_insert_node_into_itself() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");

    assert_hierarchy_error(tree.append_child(div, div));
    assert!(tree.children(div).is_empty());
}

#[test]
fn test_insert_ancestor_into_descendant() {
    let mut tree = DomTree::new();
    let outer = alloc_element(&mut tree, "outer");
    let middle = alloc_element(&mut tree, "middle");
    let inner = alloc_element(&mut tree, "inner");
    append(&mut tree, NodeId::ROOT, outer);
    append(&mut tree, outer, middle);
    append(&mut tree, middle, inner);

    assert_hierarchy_error(tree.append_child(inner, outer));
    assert_hierarchy_error(tree.append_child(middle, outer));
    assert_hierarchy_error(tree.append_child(inner, NodeId::ROOT));

    // Tree unchanged
    assert_eq!(tree.children(NodeId::ROOT), &[outer]);
    assert_eq!(tree.children(outer), &[middle]);
    assert_eq!(tree.children(middle), &[inner]);
    assert!(tree.children(inner).is_empty());
}

#[test]
fn test_insert_host_into_its_template_content() {
    let mut tree = DomTree::new();
    let body = alloc_element(&mut tree, "body");
    let template = alloc_element(&mut tree, "template");
    append(&mut tree, NodeId::ROOT, body);
    append(&mut tree, body, template);

    let content = tree.create_document_fragment();
    tree.set_host(content, template).unwrap();
    let slot = alloc_element(&mut tree, "div");
    append(&mut tree, content, slot);

    // The host and its ancestors are host-including ancestors of the content.
    assert!(tree.is_host_including_inclusive_ancestor(template, slot));
    assert!(tree.is_host_including_inclusive_ancestor(body, content));
    assert!(!tree.is_ancestor_of(template, slot));

    assert_hierarchy_error(tree.append_child(slot, template));
    assert_hierarchy_error(tree.append_child(content, body));
    assert_eq!(tree.parent(template), Some(body));

    // Unrelated nodes may still go in.
    let span = alloc_element(&mut tree, "span");
    append(&mut tree, slot, span);
}

#[test]
fn test_nested_host_chain() {
    let mut tree = DomTree::new();
    let outer_host = alloc_element(&mut tree, "outer");
    append(&mut tree, NodeId::ROOT, outer_host);
    let outer_content = tree.create_document_fragment();
    tree.set_host(outer_content, outer_host).unwrap();

    let inner_host = alloc_element(&mut tree, "inner");
    append(&mut tree, outer_content, inner_host);
    let inner_content = tree.create_document_fragment();
    tree.set_host(inner_content, inner_host).unwrap();

    let leaf = alloc_element(&mut tree, "leaf");
    append(&mut tree, inner_content, leaf);

    assert!(tree.is_host_including_inclusive_ancestor(outer_host, leaf));
    assert!(tree.is_host_including_inclusive_ancestor(NodeId::ROOT, leaf));
    assert_hierarchy_error(tree.append_child(leaf, outer_host));
}

// ========== node kinds ==========

#[test]
fn test_endpoint_parents_reject_children() {
    let mut tree = DomTree::new();
    let text = tree.create_text("t");
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    let doctype = tree.alloc(NodeType::doctype("html"));
    let pi = tree.alloc(NodeType::ProcessingInstruction(ProcessingInstructionData {
        target: "xml-stylesheet".to_string(),
        data: String::new(),
    }));
    let child = alloc_element(&mut tree, "b");

    for parent in [text, comment, doctype, pi] {
        assert_hierarchy_error(tree.append_child(parent, child));
    }
    assert_eq!(tree.parent(child), None);
}

#[test]
fn test_document_is_never_insertable() {
    let mut tree = DomTree::new();
    let other = tree.create_document();
    let div = alloc_element(&mut tree, "div");

    assert_hierarchy_error(tree.append_child(div, other));
    assert_hierarchy_error(tree.append_child(NodeId::ROOT, other));
}

#[test]
fn test_doctype_only_under_documents() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let fragment = tree.create_document_fragment();
    let doctype = tree.alloc(NodeType::doctype("html"));

    assert_hierarchy_error(tree.append_child(div, doctype));
    assert_hierarchy_error(tree.append_child(fragment, doctype));
}

#[test]
fn test_cycle_check_runs_before_reference_check() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let stranger = alloc_element(&mut tree, "x");

    // Both rules are broken; the hierarchy error is reported.
    assert_hierarchy_error(tree.insert_before(div, div, Some(stranger)));
}

#[test]
fn test_unknown_nodes_are_not_found() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");

    assert!(matches!(
        tree.append_child(NodeId(77), div),
        Err(DomError::NotFound(_))
    ));
    assert!(matches!(
        tree.append_child(div, NodeId(77)),
        Err(DomError::NotFound(_))
    ));
}

// ========== document: elements ==========

#[test]
fn test_document_accepts_single_element() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    append(&mut tree, NodeId::ROOT, html);
    assert_eq!(tree.document_element(NodeId::ROOT), Some(html));
}

#[test]
fn test_document_rejects_second_element() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    append(&mut tree, NodeId::ROOT, html);

    let second = alloc_element(&mut tree, "body");
    assert_hierarchy_error(tree.append_child(NodeId::ROOT, second));
    assert_hierarchy_error(tree.insert_before(NodeId::ROOT, second, Some(html)));
    assert_eq!(tree.children(NodeId::ROOT), &[html]);
    assert_eq!(tree.element_count(NodeId::ROOT), 1);
}

#[test]
fn test_document_element_cannot_move_within_document() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    let html = alloc_element(&mut tree, "html");
    append(&mut tree, NodeId::ROOT, comment);
    append(&mut tree, NodeId::ROOT, html);

    // The existing document element counts, even when it is the node moved.
    assert_hierarchy_error(tree.insert_before(NodeId::ROOT, html, Some(comment)));
    // So is the same-position move before itself.
    assert_hierarchy_error(tree.pre_insert(NodeId::ROOT, html, Some(html)));
    assert_eq!(tree.children(NodeId::ROOT), &[comment, html]);
}

#[test]
fn test_element_cannot_precede_doctype() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    let doctype = tree.alloc(NodeType::doctype("html"));
    append(&mut tree, NodeId::ROOT, comment);
    append(&mut tree, NodeId::ROOT, doctype);

    let html = alloc_element(&mut tree, "html");
    // Before the doctype itself
    assert_hierarchy_error(tree.insert_before(NodeId::ROOT, html, Some(doctype)));
    // Before a node that is followed by the doctype
    assert_hierarchy_error(tree.insert_before(NodeId::ROOT, html, Some(comment)));
    assert!(tree.is_followed_by_doctype(comment));

    append(&mut tree, NodeId::ROOT, html);
    assert_eq!(tree.children(NodeId::ROOT), &[comment, doctype, html]);
}

// ========== document: text ==========

#[test]
fn test_document_rejects_text() {
    let mut tree = DomTree::new();
    let text = tree.create_text("stray");
    let cdata = tree.alloc(NodeType::CdataSection("raw".to_string()));

    assert_hierarchy_error(tree.append_child(NodeId::ROOT, text));
    assert_hierarchy_error(tree.append_child(NodeId::ROOT, cdata));
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_document_accepts_comments_and_processing_instructions() {
    let mut tree = DomTree::new();
    let (doctype, html) = document_with_doctype_and_root(&mut tree);
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    let pi = tree.alloc(NodeType::ProcessingInstruction(ProcessingInstructionData {
        target: "xml-stylesheet".to_string(),
        data: "href=\"a.css\"".to_string(),
    }));

    append(&mut tree, NodeId::ROOT, comment);
    let _ = tree
        .insert_before(NodeId::ROOT, pi, Some(doctype))
        .unwrap();
    assert_eq!(tree.children(NodeId::ROOT), &[pi, doctype, html, comment]);
}

// ========== document: doctypes ==========

#[test]
fn test_doctype_after_document_element_rejected() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    append(&mut tree, NodeId::ROOT, html);

    let doctype = tree.alloc(NodeType::doctype("html"));
    assert_hierarchy_error(tree.append_child(NodeId::ROOT, doctype));
    assert_eq!(tree.doctype(NodeId::ROOT), None);
}

#[test]
fn test_doctype_before_document_element_accepted() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    append(&mut tree, NodeId::ROOT, html);

    let doctype = tree.alloc(NodeType::doctype("html"));
    let _ = tree
        .insert_before(NodeId::ROOT, doctype, Some(html))
        .unwrap();

    assert_eq!(tree.doctype(NodeId::ROOT), Some(doctype));
    assert_eq!(tree.document_element(NodeId::ROOT), Some(html));
    assert!(tree.precedes(doctype, html));
}

#[test]
fn test_doctype_rejected_before_node_preceded_by_element() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let comment = tree.alloc(NodeType::Comment("after".to_string()));
    append(&mut tree, NodeId::ROOT, html);
    append(&mut tree, NodeId::ROOT, comment);

    let doctype = tree.alloc(NodeType::doctype("html"));
    assert!(tree.is_preceded_by_element(comment));
    assert_hierarchy_error(tree.insert_before(NodeId::ROOT, doctype, Some(comment)));
}

#[test]
fn test_second_doctype_rejected() {
    let mut tree = DomTree::new();
    let (doctype, _html) = document_with_doctype_and_root(&mut tree);

    let another = tree.alloc(NodeType::doctype("html"));
    assert_hierarchy_error(tree.insert_before(NodeId::ROOT, another, Some(doctype)));
}

#[test]
fn test_doctype_appended_to_empty_document() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::doctype("html"));
    append(&mut tree, NodeId::ROOT, doctype);
    assert_eq!(tree.doctype(NodeId::ROOT), Some(doctype));
}

// ========== document: fragments ==========

#[test]
fn test_fragment_with_two_elements_rejected() {
    let mut tree = DomTree::new();
    let fragment = tree.create_document_fragment();
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    append(&mut tree, fragment, a);
    append(&mut tree, fragment, b);

    assert_hierarchy_error(tree.append_child(NodeId::ROOT, fragment));
    // Fragment untouched
    assert_eq!(tree.children(fragment), &[a, b]);
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_fragment_with_text_rejected() {
    let mut tree = DomTree::new();
    let fragment = tree.create_document_fragment();
    let text = tree.create_text("t");
    append(&mut tree, fragment, text);

    assert!(tree.has_text_nodes(fragment));
    assert_hierarchy_error(tree.append_child(NodeId::ROOT, fragment));
}

#[test]
fn test_fragment_element_when_document_has_one() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    append(&mut tree, NodeId::ROOT, html);

    let fragment = tree.create_document_fragment();
    let extra = alloc_element(&mut tree, "extra");
    append(&mut tree, fragment, extra);

    assert_hierarchy_error(tree.append_child(NodeId::ROOT, fragment));
    assert_eq!(tree.children(NodeId::ROOT), &[html]);
    assert_eq!(tree.children(fragment), &[extra]);
}

#[test]
fn test_fragment_element_before_doctype_rejected() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::doctype("html"));
    append(&mut tree, NodeId::ROOT, doctype);

    let fragment = tree.create_document_fragment();
    let html = alloc_element(&mut tree, "html");
    append(&mut tree, fragment, html);

    assert_hierarchy_error(tree.insert_before(NodeId::ROOT, fragment, Some(doctype)));
}

#[test]
fn test_fragment_accepted_into_document() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::doctype("html"));
    append(&mut tree, NodeId::ROOT, doctype);

    let fragment = tree.create_document_fragment();
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    let html = alloc_element(&mut tree, "html");
    append(&mut tree, fragment, comment);
    append(&mut tree, fragment, html);

    append(&mut tree, NodeId::ROOT, fragment);
    assert_eq!(tree.children(NodeId::ROOT), &[doctype, comment, html]);
    assert_eq!(tree.document_element(NodeId::ROOT), Some(html));
}

#[test]
fn test_fragment_without_elements_may_precede_doctype() {
    let mut tree = DomTree::new();
    let (doctype, html) = document_with_doctype_and_root(&mut tree);

    let fragment = tree.create_document_fragment();
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    append(&mut tree, fragment, comment);

    let _ = tree
        .insert_before(NodeId::ROOT, fragment, Some(doctype))
        .unwrap();
    assert_eq!(tree.children(NodeId::ROOT), &[comment, doctype, html]);
}

// ========== non-document parents ==========

#[test]
fn test_elements_accept_any_non_doctype_child() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let text = tree.create_text("t");
    let cdata = tree.alloc(NodeType::CdataSection("c".to_string()));

    for child in [a, b, text, cdata] {
        append(&mut tree, div, child);
    }
    assert_eq!(tree.children(div), &[a, b, text, cdata]);
    assert_eq!(tree.element_count(div), 2);
    assert!(tree.has_text_nodes(div));
}

#[test]
fn test_ensure_validity_does_not_mutate() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let span = alloc_element(&mut tree, "span");

    assert_eq!(tree.ensure_pre_insertion_validity(div, span, None), Ok(()));
    assert_eq!(tree.parent(span), None);
    assert!(tree.children(div).is_empty());
}
