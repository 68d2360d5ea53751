use once_cell::sync::Lazy;
use regex::Regex;

static EDIT_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*.*?\*\*|--.*?--").expect("edit marker regex"));

/// Inline markup for a tracked insertion. The glyph pair is the detection
/// contract: `has_edit_markers` must match any text these produce.
pub fn format_insertion(text: &str) -> String {
    format!("**{text}**")
}

/// Inline markup for a tracked deletion.
pub fn format_deletion(text: &str) -> String {
    format!("--{text}--")
}

/// True when `text` contains at least one rendered insertion or deletion
/// span. Assumes marker glyphs do not occur in ordinary prose.
pub fn has_edit_markers(text: &str) -> bool {
    EDIT_MARKER_RE.is_match(text)
}
