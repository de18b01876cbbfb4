//! Range rendering: turn an inclusive code point interval into a record.
//!
//! [`render_range`] walks every face in a font file and produces one
//! fontstack per face. The per-face work goes through the [`GlyphSource`]
//! trait so the metric and filtering logic is testable without font files
//! or a rasterizer.

use std::path::Path;

use glyphstack_core::model::{encode_stacks, FontStack, Glyph};

use crate::error::{RenderError, Result};
use crate::font::{FaceHandle, FontFile};
use crate::sdf::{SdfGlyph, SdfRasterizer};

/// One font face the range renderer can query and rasterize.
pub trait GlyphSource {
    /// Glyph index for a code point, `None` when the face cannot render it.
    fn glyph_index(&self, code_point: u32) -> Option<u16>;

    /// Rasterize one glyph to an SDF bitmap with metrics.
    fn render_sdf(&mut self, glyph_index: u16) -> SdfGlyph;
}

/// A parsed face paired with its raster engine.
pub struct FaceSource<'a> {
    face: FaceHandle<'a>,
    rasterizer: SdfRasterizer<'a>,
}

impl<'a> FaceSource<'a> {
    pub fn new(face: FaceHandle<'a>) -> Result<Self> {
        let rasterizer = SdfRasterizer::new(&face)?;
        Ok(Self { face, rasterizer })
    }
}

impl GlyphSource for FaceSource<'_> {
    fn glyph_index(&self, code_point: u32) -> Option<u16> {
        self.face.glyph_index(code_point)
    }

    fn render_sdf(&mut self, glyph_index: u16) -> SdfGlyph {
        self.rasterizer.render(glyph_index)
    }
}

/// Render every supported code point of `start..=end` from `font_file` into
/// one encoded record, one fontstack per face in file order.
///
/// All-or-nothing: a parse failure, a missing family name, or a metric that
/// does not fit its field aborts the whole render.
pub fn render_range(font_file: &Path, start: u32, end: u32) -> Result<Vec<u8>> {
    if start > end {
        return Err(RenderError::InvalidRange { start, end });
    }
    let font = FontFile::open(font_file)?;
    let mut stacks = Vec::new();
    for index in 0..font.face_count() {
        let face = font.face(index)?;
        let name = face
            .display_name()
            .ok_or(RenderError::MissingFamilyName { index })?;
        tracing::debug!("rendering {start}-{end} for face {index} ({name})");
        let mut source = FaceSource::new(face)?;
        stacks.push(render_stack(&mut source, &name, start, end)?);
    }
    Ok(encode_stacks(&stacks))
}

/// Render one fontstack by rasterizing `start..=end` from `source`.
///
/// Code points the source cannot map are left out. `top` is stored
/// relative to the face ascender; it and the rounded advance must fit
/// their record fields or the whole stack fails.
pub fn render_stack<S: GlyphSource>(
    source: &mut S,
    name: &str,
    start: u32,
    end: u32,
) -> Result<FontStack> {
    if start > end {
        return Err(RenderError::InvalidRange { start, end });
    }
    let mut glyphs = Vec::new();
    for code_point in start..=end {
        let Some(glyph_index) = source.glyph_index(code_point) else {
            continue;
        };
        let rendered = source.render_sdf(glyph_index);

        let top = f64::from(rendered.top) - rendered.ascender;
        if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&top) {
            return Err(RenderError::MetricOverflow {
                code_point,
                metric: "top",
                value: top,
            });
        }
        let advance = rendered.advance.round();
        if !(0.0..=f64::from(u32::MAX)).contains(&advance) {
            return Err(RenderError::MetricOverflow {
                code_point,
                metric: "advance",
                value: advance,
            });
        }

        let has_ink = rendered.width > 0;
        glyphs.push(Glyph {
            id: code_point,
            bitmap: has_ink.then_some(rendered.bitmap),
            width: rendered.width,
            height: rendered.height,
            left: rendered.left,
            top: top as i32,
            advance: advance as u32,
        });
    }
    Ok(FontStack {
        name: name.to_owned(),
        range: format!("{start}-{end}"),
        glyphs,
    })
}
