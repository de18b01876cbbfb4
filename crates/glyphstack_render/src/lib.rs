//! Glyph stack production from font files.
//!
//! This crate provides:
//! - Face enumeration with names and character coverage ([`load_faces`])
//! - Range rendering: an inclusive code point interval rasterized to 24 px
//!   SDF bitmaps and encoded as one record, one fontstack per face
//!   ([`render_range`])
//!
//! Font parsing is ttf-parser, rasterization is swash. Both sit behind the
//! [`GlyphSource`] seam so the encoding pipeline tests run without fonts.

pub mod encode;
pub mod error;
pub mod faces;
pub mod font;
pub mod sdf;

pub use encode::{render_range, render_stack, FaceSource, GlyphSource};
pub use error::{RenderError, Result};
pub use faces::{load_faces, FaceMetadata};
pub use font::{FaceHandle, FontFile};
pub use sdf::{distance_field, SdfGlyph, SdfRasterizer, RENDER_SIZE, SDF_BUFFER, SDF_CUTOFF};
