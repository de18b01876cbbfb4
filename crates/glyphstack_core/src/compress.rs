//! Transparent record decompression.
//!
//! Compositing inputs may arrive gzip- or zlib-framed (tile pipelines store
//! both). Framing is detected from the magic bytes, never from file names,
//! and inflated before any parsing happens.

use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};

use crate::error::{CodecError, Result};

/// Whether `data` starts with a gzip or zlib stream header.
pub fn is_compressed(data: &[u8]) -> bool {
    is_gzip(data) || is_zlib(data)
}

fn is_gzip(data: &[u8]) -> bool {
    data.len() > 2 && data[0] == 0x1f && data[1] == 0x8b
}

fn is_zlib(data: &[u8]) -> bool {
    data.len() > 2 && data[0] == 0x78 && matches!(data[1], 0x01 | 0x9c | 0xda)
}

/// Inflate one compressed record, picking the decoder by magic bytes.
///
/// Data that [`is_compressed`] rejects should not be passed here; it will
/// fail as a broken zlib stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    if is_gzip(data) {
        GzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(CodecError::Decompression)?;
    } else {
        ZlibDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(CodecError::Decompression)?;
    }
    Ok(out)
}
