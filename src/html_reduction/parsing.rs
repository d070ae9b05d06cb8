//! Tolerant HTML parsing into a [`Document`].
//!
//! html5ever does the actual parsing (auto-closing, adoption agency, foster
//! parenting) into an `RcDom`, which is then copied into the arena-backed
//! [`Document`] with an explicit work stack.

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::QuirksMode;
use html5ever::{ParseOpts, QualName, local_name, ns, parse_document, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::document::{Doctype, Document, Element, Namespace, Node};
use super::serialization::doctype_markup;

/// Parse arbitrary, possibly malformed HTML.
///
/// Full pages (a leading doctype or `<html>` tag) go through the document
/// algorithm so `<head>`/`<body>` survive; everything else is parsed as a
/// fragment in `<body>` context. Never fails: the worst case is an empty
/// document.
#[must_use]
pub fn parse_html(html: &str) -> Document {
    if html.is_empty() {
        return Document::new();
    }

    if looks_like_full_document(html) {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        let mut doc = Document::new();
        doc.set_doctype(find_doctype(&dom));
        copy_children(&dom.document, &mut doc);
        doc
    } else {
        let context = QualName::new(None, ns!(html), local_name!("body"));
        let dom = parse_fragment(
            RcDom::default(),
            ParseOpts::default(),
            context,
            Vec::new(),
            false,
        )
        .one(html);

        let mut doc = Document::new();
        // Fragment parsing wraps the parsed nodes in a synthetic <html> element
        let wrapper = dom
            .document
            .children
            .borrow()
            .iter()
            .find(|child| matches!(child.data, NodeData::Element { .. }))
            .cloned();
        match wrapper {
            Some(wrapper) => copy_children(&wrapper, &mut doc),
            None => log::debug!("Fragment parse produced no wrapper element"),
        }
        doc
    }
}

/// Whether the input starts like a complete HTML page.
///
/// Leading whitespace, a byte-order mark, and comments are skipped.
pub(crate) fn looks_like_full_document(html: &str) -> bool {
    let mut rest = html.trim_start_matches('\u{feff}').trim_start();

    while let Some(after_open) = rest.strip_prefix("<!--") {
        match after_open.find("-->") {
            Some(end) => rest = after_open[end + 3..].trim_start(),
            None => return false,
        }
    }

    starts_with_ignore_case(rest, "<!doctype") || starts_with_ignore_case(rest, "<html")
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn find_doctype(dom: &RcDom) -> Option<Doctype> {
    let doctype = dom
        .document
        .children
        .borrow()
        .iter()
        .find_map(|child| match &child.data {
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => Some(Doctype {
                name: name.to_string(),
                public_id: non_empty(public_id),
                system_id: non_empty(system_id),
                force_quirks: false,
            }),
            _ => None,
        })?;

    Some(spelling_for_mode(doctype, dom.quirks_mode.get()))
}

fn non_empty(value: &StrTendril) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Pick a doctype spelling that re-parses into `mode`.
///
/// The DOM keeps neither the force-quirks flag nor the difference between a
/// missing and an empty identifier, and both can decide the quirks mode.
fn spelling_for_mode(doctype: Doctype, mode: QuirksMode) -> Doctype {
    let mut candidates = vec![doctype.clone()];
    if doctype.public_id.is_some() && doctype.system_id.is_none() {
        candidates.push(Doctype {
            system_id: Some(String::new()),
            ..doctype.clone()
        });
    }
    candidates.push(Doctype {
        force_quirks: true,
        ..doctype.clone()
    });

    match candidates
        .into_iter()
        .find(|candidate| quirks_mode_of(candidate) == mode)
    {
        Some(candidate) => candidate,
        None => {
            log::debug!("No doctype spelling reproduces {mode:?}; keeping {doctype:?}");
            doctype
        }
    }
}

fn quirks_mode_of(doctype: &Doctype) -> QuirksMode {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(doctype_markup(doctype));
    dom.quirks_mode.get()
}

/// Copy the children of `source` (and everything below) into `doc` as top-level nodes
fn copy_children(source: &Handle, doc: &mut Document) {
    let mut stack: Vec<(Handle, ego_tree::NodeId)> = vec![(source.clone(), doc.root_id())];

    while let Some((handle, parent_id)) = stack.pop() {
        for child in child_handles(&handle) {
            let Some(node) = convert_node(&child) else {
                continue;
            };
            let is_element = matches!(node, Node::Element(_));
            let Some(id) = doc.append(parent_id, node) else {
                continue;
            };
            if is_element {
                stack.push((child, id));
            }
        }
    }
}

/// Children of a handle; `<template>` elements expose their content fragment instead.
fn child_handles(handle: &Handle) -> Vec<Handle> {
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            return contents.children.borrow().clone();
        }
    }
    handle.children.borrow().clone()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::in_namespace(name.local.to_string(), namespace_of(name));
            for attr in attrs.borrow().iter() {
                element.insert_attr_if_absent(qualified_attr_name(&attr.name), attr.value.to_string());
            }
            Some(Node::Element(element))
        }
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::Comment(contents.to_string())),
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
            None
        }
    }
}

fn namespace_of(name: &QualName) -> Namespace {
    match name.ns {
        ns!(html) => Namespace::Html,
        ns!(svg) => Namespace::Svg,
        ns!(mathml) => Namespace::MathMl,
        _ => Namespace::Other,
    }
}

/// `xlink:href` stays `xlink:href`; plain HTML attributes are just their local name
fn qualified_attr_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}
