pub mod anchors;
pub mod text;
pub mod threads;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::Serialize;

use crate::docx::package::DocxPackage;
use crate::docx::tree::{build_tree, collect_named, XmlNode};
use crate::docx::xml::parse_xml_part;
use crate::progress::ConsoleProgress;

pub use anchors::{resolve_anchors, AnchorResolution, ResolvedAnchor};
pub use text::{paragraph_text, Edit, EditKind};
pub use threads::{join_threads, CommentStore, CommentThread};

/// One rendered paragraph with its overlaid edits and resolved comment
/// threads. All fields are always present; content is immutable once built.
#[derive(Clone, Debug, Serialize)]
pub struct Paragraph {
    pub id: String,
    pub content: String,
    pub edits: Vec<Edit>,
    pub comments: Vec<CommentThread>,
}

impl Paragraph {
    /// A paragraph earns a transcript block when it carries at least one
    /// rendered edit marker or one comment thread.
    pub fn qualifies(&self) -> bool {
        !self.comments.is_empty() || crate::markup::has_edit_markers(&self.content)
    }
}

const DOCUMENT_PART: &str = "word/document.xml";
const COMMENTS_PART: &str = "word/comments.xml";

/// Derives the full paragraph list from a package: body text with edit
/// markup, plus comment threads joined against the definitions part. Local
/// malformations (unmatched/unclosed comment ranges) degrade that paragraph
/// and warn; a missing required part or dangling comment id aborts the run.
pub fn extract_document(
    pkg: &DocxPackage,
    progress: &ConsoleProgress,
) -> anyhow::Result<Vec<Paragraph>> {
    let doc_root = required_part_tree(pkg, DOCUMENT_PART)?;
    let comments_root = required_part_tree(pkg, COMMENTS_PART)?;
    let store = CommentStore::from_comments_part(&comments_root);

    let mut nodes: Vec<&XmlNode> = Vec::new();
    collect_named(&doc_root, "w:p", &mut nodes);

    let mut paragraphs = Vec::new();
    for (index, node) in nodes.into_iter().enumerate() {
        let (content, edits) = paragraph_text(node);
        if content.trim().is_empty() {
            continue;
        }
        let id = node
            .attr("w14:paraId")
            .map(|s| s.to_string())
            .unwrap_or_else(|| index.to_string());

        let resolution = resolve_anchors(node);
        for warning in &resolution.warnings {
            progress.warn(format!("paragraph {id}: {warning}"));
        }
        let comments = join_threads(&resolution.anchors, &store)
            .with_context(|| format!("join comment bodies for paragraph {id}"))?;

        paragraphs.push(Paragraph {
            id,
            content,
            edits,
            comments,
        });
    }
    Ok(paragraphs)
}

fn required_part_tree(pkg: &DocxPackage, name: &str) -> anyhow::Result<XmlNode> {
    let bytes = pkg
        .part(name)
        .ok_or_else(|| anyhow!("document package is malformed: missing {name}"))?;
    let part = parse_xml_part(name, bytes).with_context(|| format!("parse {name}"))?;
    build_tree(&part).with_context(|| format!("build tree for {name}"))
}

#[derive(Serialize)]
struct ParagraphsJson<'a> {
    version: u32,
    paragraphs: &'a [Paragraph],
}

pub fn write_paragraphs_json(paragraphs: &[Paragraph], output: &Path) -> anyhow::Result<()> {
    let json = ParagraphsJson {
        version: 1,
        paragraphs,
    };
    fs::write(
        output,
        serde_json::to_vec_pretty(&json).context("serialize paragraphs json")?,
    )
    .with_context(|| format!("write paragraphs json: {}", output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::docx::package::DocxPackage;
    use crate::progress::ConsoleProgress;

    use super::extract_document;

    fn package(parts: &[(&str, &str)]) -> DocxPackage {
        let mut zw = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            zw.start_file(*name, SimpleFileOptions::default())
                .expect("start zip file");
            zw.write_all(body.as_bytes()).expect("write zip file");
        }
        let buf = zw.finish().expect("finish zip");
        DocxPackage::from_reader(buf).expect("read package")
    }

    const EMPTY_COMMENTS: &str = "<w:comments/>";

    fn body(paragraphs: &str) -> String {
        format!("<w:document><w:body>{paragraphs}</w:body></w:document>")
    }

    #[test]
    fn missing_comments_part_is_malformed() {
        let pkg = package(&[("word/document.xml", "<w:document/>")]);
        let err = extract_document(&pkg, &ConsoleProgress::new(false)).unwrap_err();
        assert!(err.to_string().contains("malformed"));
        assert!(err.to_string().contains("word/comments.xml"));
    }

    #[test]
    fn missing_document_part_is_malformed() {
        let pkg = package(&[("word/comments.xml", EMPTY_COMMENTS)]);
        let err = extract_document(&pkg, &ConsoleProgress::new(false)).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn empty_paragraphs_are_discarded() {
        let doc = body("<w:p><w:r><w:t>  </w:t></w:r></w:p><w:p><w:r><w:t>kept</w:t></w:r></w:p>");
        let pkg = package(&[
            ("word/document.xml", &doc),
            ("word/comments.xml", EMPTY_COMMENTS),
        ]);
        let paragraphs = extract_document(&pkg, &ConsoleProgress::new(false)).expect("extract");
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].content, "kept");
    }

    #[test]
    fn para_id_attr_wins_over_positional_index() {
        let doc = "<w:document><w:body>\
             <w:p w14:paraId=\"CAFE01\"><w:r><w:t>a</w:t></w:r></w:p>\
             <w:p><w:r><w:t>b</w:t></w:r></w:p>\
             </w:body></w:document>";
        let pkg = package(&[
            ("word/document.xml", doc),
            ("word/comments.xml", EMPTY_COMMENTS),
        ]);
        let paragraphs = extract_document(&pkg, &ConsoleProgress::new(false)).expect("extract");
        assert_eq!(paragraphs[0].id, "CAFE01");
        assert_eq!(paragraphs[1].id, "1");
    }

    #[test]
    fn comment_threads_attach_to_their_paragraph() {
        let doc = body(
            "<w:p><w:commentRangeStart w:id=\"5\"/><w:r><w:t>foo</w:t></w:r>\
             <w:commentRangeEnd w:id=\"5\"/>\
             <w:commentRangeStart w:id=\"7\"/><w:r><w:t>foo</w:t></w:r>\
             <w:commentRangeEnd w:id=\"7\"/></w:p>",
        );
        let comments = "<w:comments>\
            <w:comment w:id=\"5\"><w:p><w:r><w:t>primary</w:t></w:r></w:p></w:comment>\
            <w:comment w:id=\"7\"><w:p><w:r><w:t>reply</w:t></w:r></w:p></w:comment>\
            </w:comments>";
        let pkg = package(&[("word/document.xml", &doc), ("word/comments.xml", comments)]);
        let paragraphs = extract_document(&pkg, &ConsoleProgress::new(false)).expect("extract");
        assert_eq!(paragraphs.len(), 1);
        let threads = &paragraphs[0].comments;
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].primary_id, "5");
        assert_eq!(threads[0].anchor, "foo");
        assert_eq!(threads[0].reply_bodies, vec!["reply".to_string()]);
    }

    #[test]
    fn dangling_comment_id_aborts_run() {
        let doc = body(
            "<w:p><w:commentRangeStart w:id=\"5\"/><w:r><w:t>foo</w:t></w:r>\
             <w:commentRangeEnd w:id=\"5\"/></w:p>",
        );
        let pkg = package(&[
            ("word/document.xml", &doc),
            ("word/comments.xml", EMPTY_COMMENTS),
        ]);
        let err = extract_document(&pkg, &ConsoleProgress::new(false)).unwrap_err();
        assert!(format!("{err:#}").contains("5"));
    }

    #[test]
    fn sole_edited_paragraph_renders_full_block() {
        let doc = body(
            "<w:p><w:r><w:t>Hello </w:t></w:r>\
             <w:ins><w:r><w:t>world</w:t></w:r></w:ins></w:p>",
        );
        let pkg = package(&[
            ("word/document.xml", &doc),
            ("word/comments.xml", EMPTY_COMMENTS),
        ]);
        let paragraphs = extract_document(&pkg, &ConsoleProgress::new(false)).expect("extract");
        let transcript = crate::render::render_transcript(&paragraphs, 1);
        assert_eq!(
            transcript,
            "===\nCurrent context:\n{Hello **world**}\n\nComment(s):\n!NONE!\n===\n"
        );
    }

    #[test]
    fn malformed_ranges_degrade_only_their_paragraph() {
        let doc = body(
            "<w:p><w:commentRangeEnd w:id=\"9\"/><w:r><w:t>first</w:t></w:r></w:p>\
             <w:p><w:r><w:t>second</w:t></w:r></w:p>",
        );
        let pkg = package(&[
            ("word/document.xml", &doc),
            ("word/comments.xml", EMPTY_COMMENTS),
        ]);
        let paragraphs = extract_document(&pkg, &ConsoleProgress::new(false)).expect("extract");
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].comments.is_empty());
    }
}
