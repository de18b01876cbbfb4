//! `glyphstack` CLI — render and composite SDF glyph stack records.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use glyphstack_core::composite;
use glyphstack_render::{load_faces, render_range};

#[derive(Parser)]
#[command(
    name = "glyphstack",
    version,
    about = "SDF glyph stacks for map text rendering"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every face in a font file with its supported code points, as JSON
    Faces {
        /// Font file (TTF/OTF, or a TTC/OTC collection)
        font: PathBuf,
    },
    /// Render an inclusive code point range into a glyph stack record
    Range {
        /// Font file (TTF/OTF, or a TTC/OTC collection)
        font: PathBuf,

        /// First code point of the range
        #[arg(long, default_value_t = 0, value_parser = parse_code_point)]
        start: u32,

        /// Last code point of the range
        #[arg(long, default_value_t = 255, value_parser = parse_code_point)]
        end: u32,

        /// Output file; the record goes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge records, the first input winning wherever code points collide
    Composite {
        /// Input records, highest priority first; "-" reads one from stdin
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file; the record goes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_code_point(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("\"{s}\" is not a code point"))?;
    if value > 65535 {
        return Err(format!("code point {value} is outside 0-65535"));
    }
    Ok(value)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Faces { font } => {
            let faces = load_faces(&font)
                .with_context(|| format!("failed to enumerate faces in {}", font.display()))?;
            let stdout = io::stdout().lock();
            serde_json::to_writer_pretty(stdout, &faces)?;
            println!();
        }
        Command::Range {
            font,
            start,
            end,
            output,
        } => {
            if start > end {
                bail!("range start {start} is past end {end}");
            }
            let record = render_range(&font, start, end).with_context(|| {
                format!("failed to render {start}-{end} from {}", font.display())
            })?;
            write_record(output.as_deref(), &record)?;
        }
        Command::Composite { inputs, output } => {
            let sources = inputs
                .iter()
                .map(|path| read_source(path))
                .collect::<Result<Vec<_>>>()?;
            let record = composite(&sources).context("failed to composite glyph stacks")?;
            write_record(output.as_deref(), &record)?;
        }
    }
    Ok(())
}

/// Read one composite input: a file path, or stdin for "-".
fn read_source(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut data = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut data)
            .context("failed to read stdin")?;
        Ok(data)
    } else {
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn write_record(path: Option<&Path>, record: &[u8]) -> Result<()> {
    tracing::debug!("writing {} byte record", record.len());
    match path {
        Some(path) => fs::write(path, record)
            .with_context(|| format!("failed to write {}", path.display())),
        None => io::stdout()
            .lock()
            .write_all(record)
            .context("failed to write to stdout"),
    }
}
