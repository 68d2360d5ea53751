use serde::Serialize;

use crate::docx::tree::XmlNode;
use crate::markup::{format_deletion, format_insertion};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Insertion,
    Deletion,
}

#[derive(Clone, Debug, Serialize)]
pub struct Edit {
    pub kind: EditKind,
    pub text: String,
}

/// Renders one paragraph node: run text passes through, each `w:ins`/`w:del`
/// block is gathered whole and formatted exactly once, anything else recurses
/// generically so blocks nested inside unknown wrappers are still found.
/// Returns the rendered text plus the ordered edit list.
pub fn paragraph_text(paragraph: &XmlNode) -> (String, Vec<Edit>) {
    let mut out = String::new();
    let mut edits = Vec::new();
    render_into(paragraph, &mut out, &mut edits);
    (out, edits)
}

fn render_into(node: &XmlNode, out: &mut String, edits: &mut Vec<Edit>) {
    for child in &node.children {
        match child.name.as_str() {
            "w:ins" => {
                let text = plain_text(child);
                // Zero-length inserted spans are no-ops, never `**""**`.
                if !text.is_empty() {
                    out.push_str(&format_insertion(&text));
                    edits.push(Edit {
                        kind: EditKind::Insertion,
                        text,
                    });
                }
            }
            "w:del" => {
                let text = plain_text(child);
                if !text.is_empty() {
                    out.push_str(&format_deletion(&text));
                    edits.push(Edit {
                        kind: EditKind::Deletion,
                        text,
                    });
                }
            }
            "w:r" => out.push_str(&plain_text(child)),
            _ => render_into(child, out, edits),
        }
    }
}

/// Concatenates all `w:t`/`w:delText` leaf text in the subtree, ignoring any
/// other internal structure.
pub fn plain_text(node: &XmlNode) -> String {
    let mut buf = String::new();
    gather_leaves(node, &mut buf);
    buf
}

fn gather_leaves(node: &XmlNode, buf: &mut String) {
    for child in &node.children {
        if child.name == "w:t" || child.name == "w:delText" {
            buf.push_str(&child.text);
        } else {
            gather_leaves(child, buf);
        }
    }
}
