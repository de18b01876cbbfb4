//! Font file access: face counting, naming, and character coverage.
//!
//! A thin layer over ttf-parser. [`FontFile`] owns the raw bytes of one
//! file (a plain TTF/OTF or a TTC/OTC collection); [`FaceHandle`] parses a
//! single face on demand and answers the queries the enumerator and the
//! range renderer need. Parsing a face validates headers only, so handles
//! are cheap to create per face.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use ttf_parser::{name_id, Face};

use crate::error::{RenderError, Result};

/// An in-memory font file, possibly a collection holding several faces.
pub struct FontFile {
    data: Vec<u8>,
}

impl FontFile {
    /// Read a font file from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { data })
    }

    /// Number of faces in the file: 1 for a plain font, the collection
    /// header count for TTC/OTC.
    pub fn face_count(&self) -> u32 {
        ttf_parser::fonts_in_collection(&self.data).unwrap_or(1)
    }

    /// Parse the face at `index`.
    pub fn face(&self, index: u32) -> Result<FaceHandle<'_>> {
        let face = Face::parse(&self.data, index).map_err(|e| RenderError::FaceParse {
            index,
            reason: e.to_string(),
        })?;
        Ok(FaceHandle {
            face,
            data: &self.data,
            index,
        })
    }
}

/// One parsed face plus the raw bytes it was parsed from.
pub struct FaceHandle<'a> {
    face: Face<'a>,
    data: &'a [u8],
    index: u32,
}

impl<'a> FaceHandle<'a> {
    /// Family name, preferring the typographic entry over the legacy one.
    pub fn family_name(&self) -> Option<String> {
        self.name_record(name_id::TYPOGRAPHIC_FAMILY)
            .or_else(|| self.name_record(name_id::FAMILY))
    }

    /// Style name, preferring the typographic entry over the legacy one.
    pub fn style_name(&self) -> Option<String> {
        self.name_record(name_id::TYPOGRAPHIC_SUBFAMILY)
            .or_else(|| self.name_record(name_id::SUBFAMILY))
    }

    /// Display name used in records: `"Family Style"`, or the family alone
    /// when the face declares no style.
    pub fn display_name(&self) -> Option<String> {
        let family = self.family_name()?;
        Some(match self.style_name() {
            Some(style) => format!("{family} {style}"),
            None => family,
        })
    }

    /// Every code point mapped by the face's Unicode character tables,
    /// ascending and de-duplicated across subtables.
    pub fn code_points(&self) -> BTreeSet<u32> {
        let mut points = BTreeSet::new();
        if let Some(cmap) = self.face.tables().cmap {
            for subtable in cmap.subtables {
                if subtable.is_unicode() {
                    subtable.codepoints(|code_point| {
                        points.insert(code_point);
                    });
                }
            }
        }
        points
    }

    /// Glyph index for a code point. `None` when the face has no mapping,
    /// including surrogate and out-of-plane values that are not scalar.
    pub fn glyph_index(&self, code_point: u32) -> Option<u16> {
        let c = char::from_u32(code_point)?;
        self.face.glyph_index(c).map(|id| id.0)
    }

    /// Face index within the containing file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Raw bytes of the containing file, for raster engines that parse the
    /// face themselves.
    pub fn raw_data(&self) -> &'a [u8] {
        self.data
    }

    fn name_record(&self, id: u16) -> Option<String> {
        self.face
            .names()
            .into_iter()
            .filter(|name| name.name_id == id && name.is_unicode())
            .find_map(|name| name.to_string())
    }
}
