use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "redline-extract.toml";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub transcript: TranscriptSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TranscriptSection {
    /// Neighbors included on each side of a flagged paragraph.
    #[serde(default)]
    pub context_radius: Option<usize>,

    /// Suffix for the default output filename: `<stem><suffix>.txt`.
    #[serde(default)]
    pub output_suffix: Option<String>,
}

impl AppConfig {
    pub fn context_radius(&self) -> usize {
        self.transcript.context_radius.unwrap_or(1)
    }

    pub fn output_suffix(&self) -> &str {
        self.transcript
            .output_suffix
            .as_deref()
            .unwrap_or("_proofread")
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text).context("parse config toml")?;
    Ok(cfg)
}

/// Search order: CWD upwards, then the input's directory upwards, then the
/// executable's directory upwards.
pub fn find_default_config(input_dir: &Path) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, CONFIG_FILENAME, 8) {
            return Some(p);
        }
    }
    if let Some(p) = find_file_upwards(input_dir, CONFIG_FILENAME, 8) {
        return Some(p);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, CONFIG_FILENAME, 8) {
                return Some(p);
            }
        }
    }
    None
}

fn find_file_upwards(start: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    for _ in 0..=max_levels {
        let cand = dir.join(filename);
        if cand.is_file() {
            return Some(cand);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
