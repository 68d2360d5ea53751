use crate::docx::tree::XmlNode;
use crate::markup::{format_deletion, format_insertion};

/// One comment range resolved to the exact text it brackets, in the order the
/// range was opened within the paragraph.
#[derive(Clone, Debug)]
pub struct ResolvedAnchor {
    pub id: String,
    pub anchor: String,
}

/// Resolver output. Warnings cover the recoverable malformations: unmatched
/// end markers and ranges left open at paragraph end (cross-paragraph ranges
/// are unsupported; their partial anchors are discarded, never propagated).
#[derive(Debug, Default)]
pub struct AnchorResolution {
    pub anchors: Vec<ResolvedAnchor>,
    pub warnings: Vec<String>,
}

struct OpenRange {
    id: String,
    anchor: String,
    closed: bool,
}

struct AnchorWalk {
    ranges: Vec<OpenRange>,
    active: Vec<String>,
    warnings: Vec<String>,
}

/// Walks one paragraph subtree resolving every comment range it contains.
/// All state lives in the walk context, so the resolver is reentrant and
/// safe to run per-paragraph in parallel.
pub fn resolve_anchors(paragraph: &XmlNode) -> AnchorResolution {
    let mut walk = AnchorWalk {
        ranges: Vec::new(),
        active: Vec::new(),
        warnings: Vec::new(),
    };
    let mut ancestors: Vec<&str> = Vec::new();
    walk.visit(paragraph, &mut ancestors);

    let mut out = AnchorResolution {
        anchors: Vec::new(),
        warnings: walk.warnings,
    };
    for range in walk.ranges {
        if range.closed {
            out.anchors.push(ResolvedAnchor {
                id: range.id,
                anchor: range.anchor,
            });
        } else {
            out.warnings.push(format!(
                "comment range {} never closed in this paragraph; discarding partial anchor",
                range.id
            ));
        }
    }
    out
}

impl AnchorWalk {
    fn visit<'a>(&mut self, node: &'a XmlNode, ancestors: &mut Vec<&'a str>) {
        for child in &node.children {
            match child.name.as_str() {
                "w:commentRangeStart" => self.on_start(child),
                "w:commentRangeEnd" => self.on_end(child),
                "w:t" | "w:delText" => self.on_leaf(child, ancestors),
                _ => {
                    ancestors.push(child.name.as_str());
                    self.visit(child, ancestors);
                    ancestors.pop();
                }
            }
        }
    }

    fn on_start(&mut self, marker: &XmlNode) {
        let Some(id) = marker.attr("w:id") else {
            self.warnings
                .push("commentRangeStart without w:id; ignoring".to_string());
            return;
        };
        // Duplicate starts reuse the existing accumulator.
        if !self.ranges.iter().any(|r| r.id == id) {
            self.ranges.push(OpenRange {
                id: id.to_string(),
                anchor: String::new(),
                closed: false,
            });
        }
        if !self.active.iter().any(|a| a == id) {
            self.active.push(id.to_string());
        }
    }

    fn on_end(&mut self, marker: &XmlNode) {
        let Some(id) = marker.attr("w:id") else {
            self.warnings
                .push("commentRangeEnd without w:id; ignoring".to_string());
            return;
        };
        if let Some(pos) = self.active.iter().position(|a| a == id) {
            self.active.remove(pos);
            if let Some(range) = self.ranges.iter_mut().find(|r| r.id == id) {
                range.closed = true;
            }
        } else {
            self.warnings.push(format!(
                "commentRangeEnd {id} has no matching start in this paragraph; ignoring"
            ));
        }
    }

    fn on_leaf(&mut self, leaf: &XmlNode, ancestors: &[&str]) {
        if self.active.is_empty() {
            return;
        }
        // Nearest block ancestor decides formatting; the leaf may sit several
        // levels below the w:ins/w:del (run, wrapper, ...).
        let text = match ancestors.iter().rev().find_map(|name| match *name {
            "w:ins" => Some(true),
            "w:del" => Some(false),
            _ => None,
        }) {
            Some(true) => format_insertion(&leaf.text),
            Some(false) => format_deletion(&leaf.text),
            None => leaf.text.clone(),
        };
        for id in &self.active {
            if let Some(range) = self.ranges.iter_mut().find(|r| &r.id == id) {
                range.anchor.push_str(&text);
            }
        }
    }
}
