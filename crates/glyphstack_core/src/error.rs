//! Error types for record decoding, decompression, and compositing.

use thiserror::Error;

/// Glyph stack codec errors.
///
/// Any of these aborts the operation that produced it; partially decoded or
/// partially merged records are never returned.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unexpected end of record")]
    UnexpectedEof,

    #[error("Unsupported wire type: {0}")]
    InvalidWireType(u8),

    #[error("Field tag 0 is reserved")]
    InvalidTag,

    #[error("Varint does not fit {0}")]
    VarintOverflow(&'static str),

    #[error("String field is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Glyph record has no id field")]
    MissingGlyphId,

    #[error("Failed to decompress record")]
    Decompression(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
