//! Glyph stack records for map text rendering.
//!
//! A glyph stack is a compact binary record holding signed-distance-field
//! bitmaps and metrics for one font over one code point range. This crate
//! owns the record format end to end:
//!
//! - Wire primitives: protobuf-style tagged messages ([`pbf`])
//! - Typed model with canonical encoding ([`model`])
//! - Transparent gzip/zlib handling ([`compress`])
//! - Fallback-chain merging ([`compose`])
//!
//! Producing records from font files lives in `glyphstack_render`; this
//! crate never touches a font.

pub mod compose;
pub mod compress;
pub mod error;
pub mod model;
pub mod pbf;

pub use compose::composite;
pub use compress::{decompress, is_compressed};
pub use error::{CodecError, Result};
pub use model::{decode_stacks, encode_stacks, FontStack, Glyph};
