use crate::context::{window, ContextWindow};
use crate::extract::Paragraph;

/// Renders one transcript block. Fixed line-oriented format: neighbors as-is,
/// subject braced, then one `[anchor] -> body. reply. ` line per thread or
/// `!NONE!` when the subject carries no threads.
pub fn render_block(win: &ContextWindow, out: &mut String) {
    out.push_str("===\n");
    out.push_str("Current context:\n");
    for (i, paragraph) in win.paragraphs.iter().enumerate() {
        if i == win.subject_index {
            out.push('{');
            out.push_str(&paragraph.content);
            out.push_str("}\n");
        } else {
            out.push_str(&paragraph.content);
            out.push('\n');
        }
    }

    out.push_str("\nComment(s):\n");
    let subject = win.subject();
    if subject.comments.is_empty() {
        out.push_str("!NONE!\n");
    } else {
        for thread in &subject.comments {
            out.push('[');
            out.push_str(&thread.anchor);
            out.push_str("] -> ");
            out.push_str(&thread.body);
            out.push_str(". ");
            for reply in &thread.reply_bodies {
                out.push_str(reply);
                out.push_str(". ");
            }
            out.push('\n');
        }
    }
    out.push_str("===\n");
}

/// Renders the whole transcript: one block per qualifying paragraph (at
/// least one edit or comment thread), each with `radius` context neighbors.
pub fn render_transcript(paragraphs: &[Paragraph], radius: usize) -> String {
    let mut out = String::new();
    for (index, paragraph) in paragraphs.iter().enumerate() {
        if !paragraph.qualifies() {
            continue;
        }
        let win = window(paragraphs, index, radius);
        render_block(&win, &mut out);
    }
    out
}
