//! Tagged binary wire format primitives.
//!
//! Glyph stack records are protobuf-style messages: a flat sequence of
//! fields, each a varint key `(tag << 3) | wire_type` followed by a payload.
//! Readers must skip fields with unknown tags so the format can grow without
//! breaking deployed decoders; only the four payload encodings below are
//! ever legal.

use crate::error::{CodecError, Result};

/// Payload encoding carried in the low three bits of a field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Base-128 varint.
    Varint,
    /// Fixed eight-byte payload.
    Fixed64,
    /// Varint length prefix followed by that many bytes.
    LengthDelimited,
    /// Fixed four-byte payload.
    Fixed32,
}

impl WireType {
    const fn id(self) -> u64 {
        match self {
            Self::Varint => 0,
            Self::Fixed64 => 1,
            Self::LengthDelimited => 2,
            Self::Fixed32 => 5,
        }
    }

    fn from_key(key: u64) -> Result<Self> {
        match key & 0x07 {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            5 => Ok(Self::Fixed32),
            other => Err(CodecError::InvalidWireType(other as u8)),
        }
    }
}

/// Cursor over one encoded message.
///
/// [`Reader::next_field`] yields `(tag, wire_type)` pairs; after each, the
/// caller must consume the payload with the matching `read_*` method or
/// [`Reader::skip`]. Length-delimited payloads come back as subslices of the
/// input, so nested messages parse without copying.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Advance to the next field key.
    ///
    /// Returns `Ok(None)` at a clean end of input. A key with tag 0 or an
    /// unsupported wire type is malformed.
    pub fn next_field(&mut self) -> Result<Option<(u32, WireType)>> {
        if self.pos == self.data.len() {
            return Ok(None);
        }
        let key = self.read_varint()?;
        let wire = WireType::from_key(key)?;
        let tag = u32::try_from(key >> 3).map_err(|_| CodecError::InvalidTag)?;
        if tag == 0 {
            return Err(CodecError::InvalidTag);
        }
        Ok(Some((tag, wire)))
    }

    /// Read one base-128 varint, at most ten bytes.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let byte = *self.data.get(self.pos).ok_or(CodecError::UnexpectedEof)?;
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::VarintOverflow("u64"))
    }

    /// Read a varint field that must fit 32 bits.
    pub fn read_uint32(&mut self) -> Result<u32> {
        u32::try_from(self.read_varint()?).map_err(|_| CodecError::VarintOverflow("u32"))
    }

    /// Read a zigzag-coded signed 32-bit field.
    pub fn read_sint32(&mut self) -> Result<i32> {
        Ok(decode_zigzag32(self.read_uint32()?))
    }

    /// Read a length-delimited payload as a subslice.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = usize::try_from(self.read_varint()?)
            .map_err(|_| CodecError::VarintOverflow("length"))?;
        let end = self.pos.checked_add(len).ok_or(CodecError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(CodecError::UnexpectedEof);
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Read a length-delimited payload as UTF-8 text.
    pub fn read_string(&mut self) -> Result<&'a str> {
        Ok(std::str::from_utf8(self.read_bytes()?)?)
    }

    /// Discard one payload without interpreting it.
    pub fn skip(&mut self, wire: WireType) -> Result<()> {
        match wire {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => self.advance(8)?,
            WireType::LengthDelimited => {
                self.read_bytes()?;
            }
            WireType::Fixed32 => self.advance(4)?,
        }
        Ok(())
    }

    fn advance(&mut self, n: usize) -> Result<()> {
        let end = self.pos.checked_add(n).ok_or(CodecError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(CodecError::UnexpectedEof);
        }
        self.pos = end;
        Ok(())
    }
}

/// Append-only message encoder.
///
/// Fields land in call order; encoders that care about canonical output
/// (everything in this crate) write them in ascending tag order. Nested
/// messages are encoded separately and attached with [`Writer::message`].
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write a varint field.
    pub fn uint32(&mut self, tag: u32, value: u32) {
        self.key(tag, WireType::Varint);
        self.varint(u64::from(value));
    }

    /// Write a zigzag-coded signed varint field.
    pub fn sint32(&mut self, tag: u32, value: i32) {
        self.key(tag, WireType::Varint);
        self.varint(u64::from(encode_zigzag32(value)));
    }

    /// Write a UTF-8 string field.
    pub fn string(&mut self, tag: u32, value: &str) {
        self.bytes(tag, value.as_bytes());
    }

    /// Write a raw length-delimited field.
    pub fn bytes(&mut self, tag: u32, value: &[u8]) {
        self.key(tag, WireType::LengthDelimited);
        self.varint(value.len() as u64);
        self.buf.extend_from_slice(value);
    }

    /// Attach an already-encoded sub-message.
    pub fn message(&mut self, tag: u32, body: &[u8]) {
        self.bytes(tag, body);
    }

    fn key(&mut self, tag: u32, wire: WireType) {
        debug_assert!(tag != 0, "field tag 0 is reserved");
        self.varint(u64::from(tag) << 3 | wire.id());
    }

    fn varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }
}

fn encode_zigzag32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

fn decode_zigzag32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint_bytes(value: u64) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.varint(value);
        writer.into_bytes()
    }

    #[test]
    fn test_varint_roundtrip() {
        for value in [0u64, 1, 127, 128, 300, 16_383, 16_384, u64::from(u32::MAX), u64::MAX] {
            let bytes = varint_bytes(value);
            let mut reader = Reader::new(&bytes);
            assert_eq!(reader.read_varint().unwrap(), value);
            assert!(reader.next_field().unwrap().is_none());
        }
    }

    #[test]
    fn test_varint_single_byte_boundary() {
        assert_eq!(varint_bytes(127), vec![0x7f]);
        assert_eq!(varint_bytes(128), vec![0x80, 0x01]);
    }

    #[test]
    fn test_varint_truncated() {
        let mut reader = Reader::new(&[0x80, 0x80]);
        assert!(matches!(
            reader.read_varint(),
            Err(CodecError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_varint_too_long() {
        let bytes = [0x80u8; 11];
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            reader.read_varint(),
            Err(CodecError::VarintOverflow(_))
        ));
    }

    #[test]
    fn test_uint32_rejects_wide_varint() {
        let bytes = varint_bytes(u64::from(u32::MAX) + 1);
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            reader.read_uint32(),
            Err(CodecError::VarintOverflow("u32"))
        ));
    }

    #[test]
    fn test_zigzag_mapping() {
        assert_eq!(encode_zigzag32(0), 0);
        assert_eq!(encode_zigzag32(-1), 1);
        assert_eq!(encode_zigzag32(1), 2);
        assert_eq!(encode_zigzag32(-2), 3);
        for value in [0, -1, 1, 63, -64, i32::MAX, i32::MIN] {
            assert_eq!(decode_zigzag32(encode_zigzag32(value)), value);
        }
    }

    #[test]
    fn test_field_roundtrip() {
        let mut writer = Writer::new();
        writer.uint32(1, 300);
        writer.sint32(2, -17);
        writer.string(3, "Open Sans");
        writer.bytes(4, &[0xde, 0xad]);
        let bytes = writer.into_bytes();

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.next_field().unwrap(), Some((1, WireType::Varint)));
        assert_eq!(reader.read_uint32().unwrap(), 300);
        assert_eq!(reader.next_field().unwrap(), Some((2, WireType::Varint)));
        assert_eq!(reader.read_sint32().unwrap(), -17);
        assert_eq!(
            reader.next_field().unwrap(),
            Some((3, WireType::LengthDelimited))
        );
        assert_eq!(reader.read_string().unwrap(), "Open Sans");
        assert_eq!(
            reader.next_field().unwrap(),
            Some((4, WireType::LengthDelimited))
        );
        assert_eq!(reader.read_bytes().unwrap(), &[0xde, 0xad]);
        assert!(reader.next_field().unwrap().is_none());
    }

    #[test]
    fn test_skip_all_wire_types() {
        // Varint and length-delimited via the writer, fixed sizes by hand.
        let mut writer = Writer::new();
        writer.uint32(1, 12);
        writer.bytes(2, b"junk");
        let mut bytes = writer.into_bytes();
        bytes.push(3 << 3 | 1);
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.push(4 << 3 | 5);
        bytes.extend_from_slice(&[0u8; 4]);
        let mut writer = Writer::new();
        writer.uint32(5, 99);
        bytes.extend_from_slice(&writer.into_bytes());

        let mut reader = Reader::new(&bytes);
        while let Some((tag, wire)) = reader.next_field().unwrap() {
            if tag == 5 {
                assert_eq!(reader.read_uint32().unwrap(), 99);
            } else {
                reader.skip(wire).unwrap();
            }
        }
    }

    #[test]
    fn test_truncated_payload() {
        let mut writer = Writer::new();
        writer.bytes(1, &[1, 2, 3, 4]);
        let mut bytes = writer.into_bytes();
        bytes.truncate(bytes.len() - 2);

        let mut reader = Reader::new(&bytes);
        reader.next_field().unwrap();
        assert!(matches!(
            reader.read_bytes(),
            Err(CodecError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_truncated_fixed_payload() {
        let bytes = [1 << 3 | 1, 0, 0];
        let mut reader = Reader::new(&bytes);
        let (_, wire) = reader.next_field().unwrap().unwrap();
        assert!(matches!(reader.skip(wire), Err(CodecError::UnexpectedEof)));
    }

    #[test]
    fn test_group_wire_types_rejected() {
        for wire in [3u8, 4] {
            let bytes = [1 << 3 | wire];
            let mut reader = Reader::new(&bytes);
            assert!(matches!(
                reader.next_field(),
                Err(CodecError::InvalidWireType(w)) if w == wire
            ));
        }
    }

    #[test]
    fn test_tag_zero_rejected() {
        // Key 0x00 decodes to tag 0, wire type varint.
        let mut reader = Reader::new(&[0x00, 0x01]);
        assert!(matches!(reader.next_field(), Err(CodecError::InvalidTag)));
    }

    #[test]
    fn test_invalid_utf8_string() {
        let mut writer = Writer::new();
        writer.bytes(1, &[0xff, 0xfe]);
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        reader.next_field().unwrap();
        assert!(matches!(
            reader.read_string(),
            Err(CodecError::InvalidUtf8(_))
        ));
    }
}
