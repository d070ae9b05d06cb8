//! The individual reduction rules.
//!
//! Every rule collects the ids it wants to change with an explicit stack
//! first and mutates afterwards, so no child list is modified while it is
//! being walked. Each rule returns how many changes it made; zero means the
//! rule is a no-op on this document.

use ego_tree::NodeId;

use super::document::{Document, Element, Node};
use super::patterns::ReductionPatterns;

/// Detach every node matching `matches`, without descending into matched subtrees.
fn prune_matching<F>(doc: &mut Document, matches: F) -> usize
where
    F: Fn(&Node) -> bool,
{
    let mut doomed: Vec<NodeId> = Vec::new();
    let mut stack: Vec<NodeId> = doc.root().children().map(|child| child.id()).collect();

    while let Some(id) = stack.pop() {
        let Some(node) = doc.get(id) else {
            continue;
        };
        if matches(node.value()) {
            doomed.push(id);
            continue;
        }
        stack.extend(node.children().map(|child| child.id()));
    }

    for id in &doomed {
        doc.detach(*id);
    }
    doomed.len()
}

/// Rule 1: drop `script`, `style`, `meta`, `link` (per the pattern table) with their content
pub fn remove_tags(doc: &mut Document, patterns: &ReductionPatterns) -> usize {
    prune_matching(doc, |node| {
        node.as_element()
            .is_some_and(|element| patterns.is_removed_tag(element.name()))
    })
}

/// Rule 2: drop every comment node
pub fn remove_comments(doc: &mut Document) -> usize {
    prune_matching(doc, Node::is_comment)
}

/// Rule 3: keep `<svg>` elements and their attributes but empty them.
///
/// Returns the number of descendant nodes detached directly under svgs.
pub fn prune_svg_contents(doc: &mut Document) -> usize {
    let svgs: Vec<NodeId> = doc
        .preorder_ids()
        .into_iter()
        .filter(|id| {
            doc.get(*id)
                .and_then(|node| node.value().as_element().map(|e| e.is("svg")))
                .unwrap_or(false)
        })
        .collect();

    svgs.into_iter().map(|id| doc.clear_children(id)).sum()
}

/// Outcome of the attribute filtering rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeFiltering {
    pub removed: usize,
    pub compacted_urls: usize,
}

/// Rule 4: strip tracking, schema-metadata, and accessibility-only attributes,
/// and compact URL attributes that carry a sanitized marker.
pub fn filter_attributes(doc: &mut Document, patterns: &ReductionPatterns) -> AttributeFiltering {
    let mut outcome = AttributeFiltering::default();

    for id in doc.preorder_ids() {
        doc.with_element_mut(id, |element| {
            outcome.removed +=
                element.retain_attrs(|name, _| !patterns.is_stripped_attribute(name));
            outcome.compacted_urls += compact_sanitized_urls(element, patterns);
        });
    }

    outcome
}

fn compact_sanitized_urls(element: &mut Element, patterns: &ReductionPatterns) -> usize {
    let url_attrs: Vec<String> = element
        .attrs()
        .filter(|(name, value)| patterns.is_url_attribute(name) && patterns.is_sanitized_url(value))
        .map(|(name, _)| name.to_string())
        .collect();

    for name in &url_attrs {
        if let Some(value) = element.attr_mut(name) {
            value.clone_from(&patterns.sanitized_url_placeholder);
        }
    }
    url_attrs.len()
}

/// Rule 5: remove elements carrying the boolean `hidden` attribute, with their subtree
pub fn remove_hidden(doc: &mut Document) -> usize {
    prune_matching(doc, |node| {
        node.as_element()
            .is_some_and(|element| element.has_attr("hidden") && !element.is_document_structure())
    })
}

/// Rule 6: remove known non-visual UI chrome (spinners, tooltips, skeleton loaders)
pub fn remove_non_visible(doc: &mut Document, patterns: &ReductionPatterns) -> usize {
    prune_matching(doc, |node| {
        node.as_element()
            .is_some_and(|element| is_non_visible(element, patterns))
    })
}

fn is_non_visible(element: &Element, patterns: &ReductionPatterns) -> bool {
    if element.is_document_structure() {
        return false;
    }
    if patterns.is_non_visible_tag(element.name()) {
        return true;
    }
    element.attrs().any(|(name, value)| {
        patterns.is_non_visible_attribute(name)
            || ((name == "class" || name == "id") && patterns.is_non_visible_class_or_id(value))
    })
}

/// A `div` that adds nothing: no attributes, and no children besides whitespace text
fn is_redundant_wrapper(doc: &Document, id: NodeId) -> bool {
    let Some(node) = doc.get(id) else {
        return false;
    };
    let is_bare_div = node
        .value()
        .as_element()
        .is_some_and(|element| element.is("div") && !element.has_attributes());

    is_bare_div && node.children().all(|child| child.value().is_whitespace_text())
}

/// Rule 7: remove redundant `div` wrappers.
///
/// Each sweep visits nodes children-before-parents, so a chain of nested
/// empty divs disappears in a single sweep. Sweeps repeat until nothing
/// changes or `max_iterations` is reached, which bounds the work on any input.
pub fn collapse_empty_wrappers(doc: &mut Document, max_iterations: usize) -> usize {
    let mut collapsed = 0;

    for iteration in 0..max_iterations {
        let mut removed_this_sweep = 0;
        for id in doc.preorder_ids().into_iter().rev() {
            if is_redundant_wrapper(doc, id) {
                doc.detach(id);
                removed_this_sweep += 1;
            }
        }

        collapsed += removed_this_sweep;
        if removed_this_sweep == 0 {
            return collapsed;
        }
        log::trace!("Wrapper collapse sweep {iteration} removed {removed_this_sweep} divs");
    }

    log::debug!("Wrapper collapsing stopped at the iteration cap ({max_iterations})");
    collapsed
}
