//! HTML serialization of a [`Document`].
//!
//! The walk uses `ego_tree`'s edge traversal (open/close events) instead of
//! recursion, so serialization cost is independent of nesting depth.

use ego_tree::iter::Edge;
use ego_tree::NodeRef;

use super::document::{Doctype, Document, Node};

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// HTML elements whose text children are emitted without entity escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// Elements where the parser drops a single newline right after the start tag
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Serialize a document back to HTML.
#[must_use]
pub fn serialize_document(doc: &Document) -> String {
    let mut output = String::new();

    if let Some(doctype) = doc.doctype() {
        output.push_str(&doctype_markup(doctype));
    }

    let mut in_plaintext = false;
    for edge in doc.root().traverse() {
        match edge {
            Edge::Open(node) => {
                open_node(node, &mut output);
                in_plaintext |= is_plaintext(node);
            }
            // The tokenizer never leaves text mode after <plaintext>
            Edge::Close(_) if in_plaintext => {}
            Edge::Close(node) => close_node(node, &mut output),
        }
    }

    output
}

/// `<!DOCTYPE ...>` markup including public and system identifiers
pub(crate) fn doctype_markup(doctype: &Doctype) -> String {
    let mut output = String::from("<!DOCTYPE");
    if !doctype.name.is_empty() {
        output.push(' ');
        output.push_str(&doctype.name);
    }

    if let Some(public_id) = &doctype.public_id {
        output.push_str(" PUBLIC ");
        push_quoted(public_id, &mut output);
        if let Some(system_id) = doctype.system_id.as_ref().filter(|_| !doctype.force_quirks) {
            output.push(' ');
            push_quoted(system_id, &mut output);
        }
    } else if let Some(system_id) = doctype.system_id.as_ref().filter(|_| !doctype.force_quirks) {
        output.push_str(" SYSTEM ");
        push_quoted(system_id, &mut output);
    }

    // A stray keyword after the name or public identifier sets the force-quirks flag
    if doctype.force_quirks {
        output.push_str(" quirks");
    }

    output.push('>');
    output
}

fn push_quoted(value: &str, output: &mut String) {
    let quote = if value.contains('"') { '\'' } else { '"' };
    output.push(quote);
    output.push_str(value);
    output.push(quote);
}

fn open_node(node: NodeRef<'_, Node>, output: &mut String) {
    match node.value() {
        Node::Fragment => {}
        Node::Element(element) => {
            output.push('<');
            output.push_str(element.name());
            for (name, value) in element.attrs() {
                output.push(' ');
                output.push_str(name);
                output.push_str("=\"");
                output.push_str(&html_escape::encode_double_quoted_attribute(value));
                output.push('"');
            }
            output.push('>');

            // Re-parsing would otherwise swallow a newline that is real content
            if LEADING_NEWLINE_ELEMENTS.iter().any(|tag| element.is_html(tag))
                && node
                    .first_child()
                    .is_some_and(|child| matches!(child.value(), Node::Text(text) if text.starts_with('\n')))
            {
                output.push('\n');
            }
        }
        Node::Text(text) => {
            if parent_is_raw_text(node) {
                output.push_str(text);
            } else {
                output.push_str(&html_escape::encode_text(text));
            }
        }
        Node::Comment(comment) => {
            output.push_str("<!--");
            output.push_str(comment);
            output.push_str("-->");
        }
    }
}

fn close_node(node: NodeRef<'_, Node>, output: &mut String) {
    if let Node::Element(element) = node.value() {
        if VOID_ELEMENTS.iter().any(|tag| element.is_html(tag)) {
            return;
        }
        output.push_str("</");
        output.push_str(element.name());
        output.push('>');
    }
}

fn is_plaintext(node: NodeRef<'_, Node>) -> bool {
    node.value()
        .as_element()
        .is_some_and(|element| element.is_html("plaintext"))
}

/// Raw text only exists in HTML-namespace elements; foreign content is always escaped
fn parent_is_raw_text(node: NodeRef<'_, Node>) -> bool {
    node.parent().is_some_and(|parent| {
        parent
            .value()
            .as_element()
            .is_some_and(|element| RAW_TEXT_ELEMENTS.iter().any(|tag| element.is_html(tag)))
    })
}
