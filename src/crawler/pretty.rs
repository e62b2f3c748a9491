//! Indented HTML serialization
//!
//! Writes one tag or text run per line, indented by nesting depth. Content of
//! `script`, `style`, `pre` and `textarea` is emitted unchanged because
//! whitespace inside them is significant.

use ego_tree::NodeRef;
use scraper::node::{Element, Node};
use scraper::{ElementRef, Html};

const INDENT: &str = "  ";

/// Elements that never have content or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is written verbatim
const VERBATIM_ELEMENTS: &[&str] = &["script", "style", "noscript", "pre", "textarea"];

/// Serializes a parsed document with one node per line
pub fn pretty_print(document: &Html) -> String {
    let mut out = String::new();
    for child in document.tree.root().children() {
        write_node(child, 0, &mut out);
    }
    out
}

fn write_node(node: NodeRef<'_, Node>, depth: usize, out: &mut String) {
    match node.value() {
        Node::Doctype(doctype) => push_line(out, depth, &format!("<!DOCTYPE {}>", doctype.name())),
        Node::Comment(comment) => push_line(out, depth, &format!("<!--{}-->", &**comment)),
        Node::Text(text) => {
            let text = text.trim();
            if !text.is_empty() {
                push_line(out, depth, &escape_text(text));
            }
        }
        Node::Element(element) => write_element(node, element, depth, out),
        _ => {
            for child in node.children() {
                write_node(child, depth, out);
            }
        }
    }
}

fn write_element(node: NodeRef<'_, Node>, element: &Element, depth: usize, out: &mut String) {
    let name = element.name();
    let open = open_tag(element);

    if VOID_ELEMENTS.contains(&name) {
        push_line(out, depth, &open);
        return;
    }

    if VERBATIM_ELEMENTS.contains(&name) {
        let inner = ElementRef::wrap(node)
            .map(|el| el.inner_html())
            .unwrap_or_default();
        push_line(out, depth, &format!("{}{}</{}>", open, inner, name));
        return;
    }

    if !node.has_children() {
        push_line(out, depth, &format!("{}</{}>", open, name));
        return;
    }

    push_line(out, depth, &open);
    for child in node.children() {
        write_node(child, depth + 1, out);
    }
    push_line(out, depth, &format!("</{}>", name));
}

fn open_tag(element: &Element) -> String {
    let mut tag = format!("<{}", element.name());
    for (name, value) in element.attrs() {
        tag.push(' ');
        tag.push_str(name);
        tag.push_str("=\"");
        tag.push_str(&escape_attr(value));
        tag.push('"');
    }
    tag.push('>');
    tag
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
