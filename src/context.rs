use crate::extract::Paragraph;

/// A subject paragraph plus up to `radius` neighbors on each side. Snapshots
/// are deep clones; mutating one window never aliases the source list or
/// another window.
#[derive(Clone, Debug)]
pub struct ContextWindow {
    pub paragraphs: Vec<Paragraph>,
    pub subject_index: usize,
}

impl ContextWindow {
    pub fn subject(&self) -> &Paragraph {
        &self.paragraphs[self.subject_index]
    }
}

pub fn window(paragraphs: &[Paragraph], index: usize, radius: usize) -> ContextWindow {
    let start = index.saturating_sub(radius);
    let end = (index + radius + 1).min(paragraphs.len());
    ContextWindow {
        paragraphs: paragraphs[start..end].to_vec(),
        subject_index: index - start,
    }
}
