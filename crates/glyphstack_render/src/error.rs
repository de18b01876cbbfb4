//! Error types for face enumeration and range rendering.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rendering errors.
///
/// Range rendering is all-or-nothing: the first error anywhere in a font
/// file aborts the operation with no partial record.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to read font file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse face {index}: {reason}")]
    FaceParse { index: u32, reason: String },

    #[error("Failed to initialize the glyph scaler for face {index}")]
    ScalerInit { index: u32 },

    #[error("Face {index} has no family name")]
    MissingFamilyName { index: u32 },

    #[error("Glyph {code_point:#x}: {metric} {value} does not fit its record field")]
    MetricOverflow {
        code_point: u32,
        metric: &'static str,
        value: f64,
    },

    #[error("Invalid code point range {start}-{end}")]
    InvalidRange { start: u32, end: u32 },
}

pub type Result<T> = std::result::Result<T, RenderError>;
