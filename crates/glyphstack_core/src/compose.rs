//! Glyph stack compositing.
//!
//! Merges records rendered from different fonts over the same code point
//! range into one fallback-aware record: the first source names the range
//! and seeds the stack name, later names are appended with `", "`, and each
//! code point keeps the glyph from the earliest source that supplies it.
//! Glyph bodies are carried over byte for byte, never re-encoded.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::compress;
use crate::error::{CodecError, Result};
use crate::model::{glyph_tag, root_tag, stack_tag};
use crate::pbf::{Reader, WireType, Writer};

/// Merge `sources`, highest priority first, into one encoded record.
///
/// Sources may be gzip- or zlib-compressed; they are inflated before
/// parsing. Any malformed source fails the whole composite. An empty
/// source list yields a record with one empty fontstack.
pub fn composite<B: AsRef<[u8]>>(sources: &[B]) -> Result<Vec<u8>> {
    let buffers = sources
        .iter()
        .map(|source| {
            let data = source.as_ref();
            if compress::is_compressed(data) {
                compress::decompress(data).map(Cow::Owned)
            } else {
                Ok(Cow::Borrowed(data))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let mut name = String::new();
    let mut range = String::new();
    let mut glyphs: BTreeMap<u32, &[u8]> = BTreeMap::new();

    for (index, buffer) in buffers.iter().enumerate() {
        let mut reader = Reader::new(buffer);
        while let Some((tag, wire)) = reader.next_field()? {
            match (tag, wire) {
                (root_tag::FONTSTACK, WireType::LengthDelimited) => {
                    merge_stack(reader.read_bytes()?, index == 0, &mut name, &mut range, &mut glyphs)?;
                }
                _ => reader.skip(wire)?,
            }
        }
    }

    tracing::debug!(
        "composited {} sources into {} glyphs for '{}' {}",
        sources.len(),
        glyphs.len(),
        name,
        range
    );

    let mut stack = Writer::new();
    stack.string(stack_tag::NAME, &name);
    stack.string(stack_tag::RANGE, &range);
    for body in glyphs.values() {
        stack.message(stack_tag::GLYPH, body);
    }

    let mut writer = Writer::new();
    writer.message(root_tag::FONTSTACK, &stack.into_bytes());
    Ok(writer.into_bytes())
}

/// Fold one fontstack body into the accumulators.
///
/// Glyph dedup is first-writer-wins across the whole composite, so earlier
/// sources shadow later ones and repeated ids within one source keep their
/// first occurrence.
fn merge_stack<'a>(
    data: &'a [u8],
    first_source: bool,
    name: &mut String,
    range: &mut String,
    glyphs: &mut BTreeMap<u32, &'a [u8]>,
) -> Result<()> {
    let mut reader = Reader::new(data);
    while let Some((tag, wire)) = reader.next_field()? {
        match (tag, wire) {
            (stack_tag::NAME, WireType::LengthDelimited) => {
                let stack_name = reader.read_string()?;
                if first_source {
                    stack_name.clone_into(name);
                } else {
                    name.push_str(", ");
                    name.push_str(stack_name);
                }
            }
            (stack_tag::RANGE, WireType::LengthDelimited) => {
                // Later sources must cover the same range; only the first
                // source's declaration is kept.
                let stack_range = reader.read_string()?;
                if first_source {
                    stack_range.clone_into(range);
                } else if stack_range != range {
                    tracing::warn!(
                        "compositing source with range {stack_range} into {range}"
                    );
                }
            }
            (stack_tag::GLYPH, WireType::LengthDelimited) => {
                let body = reader.read_bytes()?;
                let id = glyph_id(body)?;
                glyphs.entry(id).or_insert(body);
            }
            _ => reader.skip(wire)?,
        }
    }
    Ok(())
}

/// Extract the id a glyph body is keyed under. Repeated id fields follow
/// last-field-wins, like any scalar protobuf field.
fn glyph_id(body: &[u8]) -> Result<u32> {
    let mut reader = Reader::new(body);
    let mut id = None;
    while let Some((tag, wire)) = reader.next_field()? {
        match (tag, wire) {
            (glyph_tag::ID, WireType::Varint) => id = Some(reader.read_uint32()?),
            _ => reader.skip(wire)?,
        }
    }
    id.ok_or(CodecError::MissingGlyphId)
}
