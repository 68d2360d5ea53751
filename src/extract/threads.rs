use std::collections::HashMap;

use anyhow::anyhow;
use serde::Serialize;

use crate::docx::tree::{collect_named, XmlNode};
use crate::extract::anchors::ResolvedAnchor;
use crate::extract::text::plain_text;

/// A primary comment plus its replies. Replies are comments whose anchor text
/// is identical to the primary's; the format exposes no reply structure at
/// this layer, so anchor equality is the documented approximation. Two
/// independent comments highlighting identical text are indistinguishable
/// from a genuine thread.
#[derive(Clone, Debug, Serialize)]
pub struct CommentThread {
    pub primary_id: String,
    pub anchor: String,
    pub body: String,
    pub reply_ids: Vec<String>,
    pub reply_bodies: Vec<String>,
}

/// Read-only id → body table built once from `word/comments.xml`.
pub struct CommentStore {
    bodies: HashMap<String, String>,
}

impl CommentStore {
    pub fn from_comments_part(root: &XmlNode) -> Self {
        let mut definitions = Vec::new();
        collect_named(root, "w:comment", &mut definitions);

        let mut bodies = HashMap::new();
        for def in definitions {
            let Some(id) = def.attr("w:id") else {
                continue;
            };
            bodies.insert(id.to_string(), plain_text(def).trim().to_string());
        }
        Self { bodies }
    }

    pub fn body(&self, id: &str) -> anyhow::Result<&str> {
        self.bodies
            .get(id)
            .map(|s| s.as_str())
            .ok_or_else(|| anyhow!("comment definition not found for id {id}"))
    }
}

/// Groups resolved anchors by anchor-string equality, preserving first-open
/// order. The first id of a group becomes the primary, the rest replies.
pub fn group_threads(anchors: &[ResolvedAnchor]) -> Vec<(String, String, Vec<String>)> {
    let mut groups: Vec<(String, String, Vec<String>)> = Vec::new();
    for resolved in anchors {
        match groups.iter_mut().find(|(_, anchor, _)| *anchor == resolved.anchor) {
            Some((_, _, replies)) => replies.push(resolved.id.clone()),
            None => groups.push((resolved.id.clone(), resolved.anchor.clone(), Vec::new())),
        }
    }
    groups
}

/// Attaches comment bodies to every grouped thread. A store miss means the
/// package references a definition that does not exist: fatal.
pub fn join_threads(
    anchors: &[ResolvedAnchor],
    store: &CommentStore,
) -> anyhow::Result<Vec<CommentThread>> {
    let mut threads = Vec::new();
    for (primary_id, anchor, reply_ids) in group_threads(anchors) {
        let body = store.body(&primary_id)?.to_string();
        let mut reply_bodies = Vec::with_capacity(reply_ids.len());
        for id in &reply_ids {
            reply_bodies.push(store.body(id)?.to_string());
        }
        threads.push(CommentThread {
            primary_id,
            anchor,
            body,
            reply_ids,
            reply_bodies,
        });
    }
    Ok(threads)
}
