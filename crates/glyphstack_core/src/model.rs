//! Typed glyph stack records and their canonical encoding.
//!
//! A record is a root message holding repeated fontstacks:
//!
//! | message   | field | tag | type             |
//! |-----------|-------|-----|------------------|
//! | root      | fontstack | 1 | message      |
//! | fontstack | name      | 1 | string       |
//! | fontstack | range     | 2 | string       |
//! | fontstack | glyph     | 3 | message      |
//! | glyph     | id        | 1 | uint32       |
//! | glyph     | bitmap    | 2 | bytes        |
//! | glyph     | width     | 3 | uint32       |
//! | glyph     | height    | 4 | uint32       |
//! | glyph     | left      | 5 | sint32       |
//! | glyph     | top       | 6 | sint32       |
//! | glyph     | advance   | 7 | uint32       |
//!
//! Tag numbers are a compatibility contract with every deployed consumer and
//! never change. Encoding emits fields in ascending tag order, so any record
//! produced here survives a decode/encode round trip byte for byte.

use crate::error::{CodecError, Result};
use crate::pbf::{Reader, WireType, Writer};

pub(crate) mod root_tag {
    pub const FONTSTACK: u32 = 1;
}

pub(crate) mod stack_tag {
    pub const NAME: u32 = 1;
    pub const RANGE: u32 = 2;
    pub const GLYPH: u32 = 3;
}

pub(crate) mod glyph_tag {
    pub const ID: u32 = 1;
    pub const BITMAP: u32 = 2;
    pub const WIDTH: u32 = 3;
    pub const HEIGHT: u32 = 4;
    pub const LEFT: u32 = 5;
    pub const TOP: u32 = 6;
    pub const ADVANCE: u32 = 7;
}

/// One rendered code point.
///
/// `bitmap` is present exactly when the glyph has ink (`width > 0`); glyphs
/// like the space still carry metrics so layout can advance past them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Code point this glyph renders.
    pub id: u32,
    /// SDF bytes, row-major, `width * height` long.
    pub bitmap: Option<Vec<u8>>,
    /// Bitmap width in pixels, padding included.
    pub width: u32,
    /// Bitmap height in pixels, padding included.
    pub height: u32,
    /// Horizontal distance from the pen position to the ink.
    pub left: i32,
    /// Vertical distance from the face ascender down to the ink top.
    pub top: i32,
    /// Horizontal advance in pixels, rounded.
    pub advance: u32,
}

impl Glyph {
    /// Encode this glyph as a standalone message body.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.uint32(glyph_tag::ID, self.id);
        if let Some(bitmap) = &self.bitmap {
            writer.bytes(glyph_tag::BITMAP, bitmap);
        }
        writer.uint32(glyph_tag::WIDTH, self.width);
        writer.uint32(glyph_tag::HEIGHT, self.height);
        writer.sint32(glyph_tag::LEFT, self.left);
        writer.sint32(glyph_tag::TOP, self.top);
        writer.uint32(glyph_tag::ADVANCE, self.advance);
        writer.into_bytes()
    }

    /// Decode one glyph message body.
    ///
    /// Unknown fields are skipped. A body without an id field is rejected;
    /// everything else defaults to zero.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        let mut id = None;
        let mut bitmap = None;
        let mut width = 0;
        let mut height = 0;
        let mut left = 0;
        let mut top = 0;
        let mut advance = 0;
        while let Some((tag, wire)) = reader.next_field()? {
            match (tag, wire) {
                (glyph_tag::ID, WireType::Varint) => id = Some(reader.read_uint32()?),
                (glyph_tag::BITMAP, WireType::LengthDelimited) => {
                    bitmap = Some(reader.read_bytes()?.to_vec());
                }
                (glyph_tag::WIDTH, WireType::Varint) => width = reader.read_uint32()?,
                (glyph_tag::HEIGHT, WireType::Varint) => height = reader.read_uint32()?,
                (glyph_tag::LEFT, WireType::Varint) => left = reader.read_sint32()?,
                (glyph_tag::TOP, WireType::Varint) => top = reader.read_sint32()?,
                (glyph_tag::ADVANCE, WireType::Varint) => advance = reader.read_uint32()?,
                _ => reader.skip(wire)?,
            }
        }
        Ok(Self {
            id: id.ok_or(CodecError::MissingGlyphId)?,
            bitmap,
            width,
            height,
            left,
            top,
            advance,
        })
    }
}

/// One font face rendered over one declared code point interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontStack {
    /// Display name, `"Family Style"`; compositing joins names with `", "`.
    pub name: String,
    /// Declared interval as the literal text `"start-end"`.
    pub range: String,
    /// Glyphs in ascending id order, one per code point.
    pub glyphs: Vec<Glyph>,
}

impl FontStack {
    /// Encode this fontstack as a standalone message body.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.string(stack_tag::NAME, &self.name);
        writer.string(stack_tag::RANGE, &self.range);
        for glyph in &self.glyphs {
            writer.message(stack_tag::GLYPH, &glyph.encode());
        }
        writer.into_bytes()
    }

    /// Decode one fontstack message body. Unknown fields are skipped;
    /// a missing name or range decodes as empty.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        let mut name = String::new();
        let mut range = String::new();
        let mut glyphs = Vec::new();
        while let Some((tag, wire)) = reader.next_field()? {
            match (tag, wire) {
                (stack_tag::NAME, WireType::LengthDelimited) => {
                    name = reader.read_string()?.to_owned();
                }
                (stack_tag::RANGE, WireType::LengthDelimited) => {
                    range = reader.read_string()?.to_owned();
                }
                (stack_tag::GLYPH, WireType::LengthDelimited) => {
                    glyphs.push(Glyph::decode(reader.read_bytes()?)?);
                }
                _ => reader.skip(wire)?,
            }
        }
        Ok(Self { name, range, glyphs })
    }
}

/// Encode a complete record holding `stacks` in order.
pub fn encode_stacks(stacks: &[FontStack]) -> Vec<u8> {
    let mut writer = Writer::new();
    for stack in stacks {
        writer.message(root_tag::FONTSTACK, &stack.encode());
    }
    writer.into_bytes()
}

/// Decode a complete record into its fontstacks.
pub fn decode_stacks(data: &[u8]) -> Result<Vec<FontStack>> {
    let mut reader = Reader::new(data);
    let mut stacks = Vec::new();
    while let Some((tag, wire)) = reader.next_field()? {
        match (tag, wire) {
            (root_tag::FONTSTACK, WireType::LengthDelimited) => {
                stacks.push(FontStack::decode(reader.read_bytes()?)?);
            }
            _ => reader.skip(wire)?,
        }
    }
    Ok(stacks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_glyph(id: u32) -> Glyph {
        Glyph {
            id,
            bitmap: Some(vec![0x40, 0x80, 0xc0, 0xff]),
            width: 2,
            height: 2,
            left: 1,
            top: -9,
            advance: 13,
        }
    }

    #[test]
    fn test_glyph_roundtrip() {
        let glyph = sample_glyph(65);
        let decoded = Glyph::decode(&glyph.encode()).unwrap();
        assert_eq!(decoded, glyph);
    }

    #[test]
    fn test_inkless_glyph_roundtrip() {
        let glyph = Glyph {
            id: 32,
            bitmap: None,
            width: 0,
            height: 0,
            left: 0,
            top: -25,
            advance: 6,
        };
        let decoded = Glyph::decode(&glyph.encode()).unwrap();
        assert_eq!(decoded.bitmap, None);
        assert_eq!(decoded, glyph);
    }

    #[test]
    fn test_glyph_missing_id_rejected() {
        let mut writer = Writer::new();
        writer.uint32(glyph_tag::WIDTH, 4);
        writer.uint32(glyph_tag::ADVANCE, 9);
        assert!(matches!(
            Glyph::decode(&writer.into_bytes()),
            Err(CodecError::MissingGlyphId)
        ));
    }

    #[test]
    fn test_glyph_unknown_field_skipped() {
        let mut body = sample_glyph(65).encode();
        let mut extra = Writer::new();
        extra.uint32(200, 7);
        extra.bytes(201, b"future");
        body.extend_from_slice(&extra.into_bytes());

        let decoded = Glyph::decode(&body).unwrap();
        assert_eq!(decoded, sample_glyph(65));
    }

    #[test]
    fn test_stack_roundtrip() {
        let stack = FontStack {
            name: "Noto Sans Regular".to_owned(),
            range: "0-255".to_owned(),
            glyphs: vec![sample_glyph(65), sample_glyph(66)],
        };
        let decoded = FontStack::decode(&stack.encode()).unwrap();
        assert_eq!(decoded, stack);
    }

    #[test]
    fn test_stack_missing_fields_default_empty() {
        let decoded = FontStack::decode(&[]).unwrap();
        assert_eq!(decoded.name, "");
        assert_eq!(decoded.range, "");
        assert!(decoded.glyphs.is_empty());
    }

    #[test]
    fn test_record_roundtrip_is_byte_exact() {
        let stacks = vec![
            FontStack {
                name: "Noto Sans Regular".to_owned(),
                range: "0-255".to_owned(),
                glyphs: vec![sample_glyph(65), sample_glyph(9731)],
            },
            FontStack {
                name: "Noto Sans Bold".to_owned(),
                range: "0-255".to_owned(),
                glyphs: vec![sample_glyph(66)],
            },
        ];
        let encoded = encode_stacks(&stacks);
        let decoded = decode_stacks(&encoded).unwrap();
        assert_eq!(decoded, stacks);
        assert_eq!(encode_stacks(&decoded), encoded);
    }

    #[test]
    fn test_empty_record_decodes_empty() {
        assert_eq!(decode_stacks(&[]).unwrap(), Vec::new());
        assert_eq!(encode_stacks(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_negative_bearings_survive() {
        let glyph = Glyph {
            id: 0x266f,
            bitmap: Some(vec![1]),
            width: 1,
            height: 1,
            left: -3,
            top: -21,
            advance: 0,
        };
        let decoded = Glyph::decode(&glyph.encode()).unwrap();
        assert_eq!(decoded.left, -3);
        assert_eq!(decoded.top, -21);
    }

    #[test]
    fn test_truncated_record_rejected() {
        let encoded = encode_stacks(&[FontStack {
            name: "Truncated".to_owned(),
            range: "0-255".to_owned(),
            glyphs: vec![sample_glyph(70)],
        }]);
        for cut in [encoded.len() - 1, encoded.len() - 3, 1] {
            assert!(decode_stacks(&encoded[..cut]).is_err());
        }
    }
}
