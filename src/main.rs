use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};

use redline_extract::config::{find_default_config, load_config, AppConfig};
use redline_extract::docx::package::DocxPackage;
use redline_extract::extract::{extract_document, write_paragraphs_json};
use redline_extract::progress::ConsoleProgress;
use redline_extract::render::render_transcript;

#[derive(Parser, Debug)]
#[command(name = "redline-extract")]
#[command(about = "Extracts a proofreading transcript (tracked changes + comment threads) from a DOCX", long_about = None)]
struct Args {
    /// Input .docx (drag-and-drop supported)
    #[arg(value_name = "DOCX")]
    input: Option<PathBuf>,

    /// Output transcript (default: <input_stem>_proofread.txt)
    #[arg(short, long, value_name = "TXT")]
    output: Option<PathBuf>,

    /// Neighbors on each side of a flagged paragraph (overrides config)
    #[arg(long, value_name = "N")]
    context_radius: Option<usize>,

    /// Config file path (default: search for redline-extract.toml upwards)
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Also write the derived paragraph records as pretty JSON
    #[arg(long, value_name = "JSON")]
    emit_paragraphs_json: Option<PathBuf>,

    /// Suppress stderr progress output
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(!args.quiet);

    let input = match args.input {
        Some(p) => p,
        None => {
            let mut cmd = Args::command();
            cmd.print_help().context("print help")?;
            eprintln!(
                "\n\nUSAGE:\n  redline-extract <input.docx>\n\nTIPS:\n  - You can drag a .docx file onto redline-extract to produce a transcript.\n  - Default config search: redline-extract.toml (upwards from the current directory).\n"
            );
            return Ok(());
        }
    };

    let input_dir = input.parent().unwrap_or_else(|| Path::new("."));
    let cfg = match args.config.or_else(|| find_default_config(input_dir)) {
        Some(path) => {
            let cfg = load_config(&path)?;
            progress.info(format!("Config: {}", path.display()));
            cfg
        }
        None => AppConfig::default(),
    };

    let radius = args.context_radius.unwrap_or_else(|| cfg.context_radius());
    let output = match args.output {
        Some(p) => p,
        None => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output")
                .to_string();
            input.with_file_name(format!("{stem}{}.txt", cfg.output_suffix()))
        }
    };

    let pkg = DocxPackage::read(&input)?;
    let paragraphs = extract_document(&pkg, &progress)?;
    progress.info(format!("Extracted {} paragraphs", paragraphs.len()));

    if let Some(json_path) = args.emit_paragraphs_json.as_ref() {
        write_paragraphs_json(&paragraphs, json_path)?;
        progress.info(format!("Wrote paragraphs JSON: {}", json_path.display()));
    }

    let flagged = paragraphs.iter().filter(|p| p.qualifies()).count();
    progress.info(format!("{flagged} paragraphs flagged for review"));

    let transcript = render_transcript(&paragraphs, radius);
    fs::write(&output, transcript)
        .with_context(|| format!("write transcript: {}", output.display()))?;
    progress.info(format!("Wrote transcript: {}", output.display()));
    Ok(())
}
