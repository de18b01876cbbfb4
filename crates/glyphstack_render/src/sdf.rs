//! SDF glyph rasterization using swash.
//!
//! Outlines are rendered to an 8-bit alpha mask, the mask is centered in a
//! grid padded by [`SDF_BUFFER`] pixels per side, and a two-pass squared
//! Euclidean distance transform turns coverage into signed distance. Each
//! pixel becomes `255 - 255 * (distance / radius + cutoff)` clamped to a
//! byte, so 255 is deep inside the ink and the glyph edge sits near
//! `255 * (1 - cutoff)`.

use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;
use swash::FontRef;

use crate::error::{RenderError, Result};
use crate::font::FaceHandle;

/// Pixel size every glyph is rendered at.
pub const RENDER_SIZE: u32 = 24;
/// Padding around the ink, in pixels, reserved for the distance falloff.
pub const SDF_BUFFER: u32 = 3;
/// Fraction of the byte range mapped to distances outside the ink.
pub const SDF_CUTOFF: f64 = 0.25;
/// Distance in pixels spanned by the full byte range.
const SDF_RADIUS: f64 = 8.0;

const INF: f64 = 1e20;

/// One rasterized glyph: distance-field bytes plus the metrics the range
/// renderer records.
#[derive(Debug, Clone, PartialEq)]
pub struct SdfGlyph {
    /// Distance-field bytes, row-major, `width * height` long. Empty when
    /// the glyph has no ink.
    pub bitmap: Vec<u8>,
    /// Bitmap width: ink width plus two buffers, or 0 without ink.
    pub width: u32,
    /// Bitmap height: ink height plus two buffers, or 0 without ink.
    pub height: u32,
    /// Left bearing of the ink, unpadded.
    pub left: i32,
    /// Top bearing of the ink above the baseline, unpadded.
    pub top: i32,
    /// Face ascent at the render size, snapped up to the pixel grid.
    pub ascender: f64,
    /// Unrounded horizontal advance at the render size.
    pub advance: f64,
}

/// Renders single glyphs from one face into SDF bitmaps.
///
/// Owns the swash scaling state for that face. Instances are built per
/// render call and never shared; the scale context keeps internal caches
/// that make repeated glyphs from the same face cheap.
pub struct SdfRasterizer<'a> {
    font: FontRef<'a>,
    scale_context: ScaleContext,
}

impl<'a> SdfRasterizer<'a> {
    /// Set up the raster engine for one face.
    pub fn new(face: &FaceHandle<'a>) -> Result<Self> {
        let font = FontRef::from_index(face.raw_data(), face.index() as usize)
            .ok_or(RenderError::ScalerInit {
                index: face.index(),
            })?;
        Ok(Self {
            font,
            scale_context: ScaleContext::new(),
        })
    }

    /// Rasterize one glyph at [`RENDER_SIZE`] and convert it to an SDF.
    ///
    /// A glyph without ink (space, or an outline swash cannot produce)
    /// comes back with zero dimensions and real metrics.
    pub fn render(&mut self, glyph_index: u16) -> SdfGlyph {
        let size = RENDER_SIZE as f32;
        let metrics = self.font.metrics(&[]);
        let glyph_metrics = self.font.glyph_metrics(&[]);
        let scale = size / metrics.units_per_em as f32;
        // Downstream offsets are measured from a ceiled ascender so the
        // whole stack stays on the pixel grid.
        let ascender = f64::from((metrics.ascent * scale).ceil());
        let advance = f64::from(glyph_metrics.advance_width(glyph_index) * scale);

        let mut scaler = self.scale_context.builder(self.font).size(size).build();
        let mut render = Render::new(&[Source::Outline]);
        render.format(Format::Alpha);
        let image = render.render(&mut scaler, glyph_index);

        match image {
            Some(img) if img.placement.width > 0 && img.placement.height > 0 => {
                let width = img.placement.width;
                let height = img.placement.height;
                let bitmap = distance_field(
                    &img.data,
                    width as usize,
                    height as usize,
                    SDF_BUFFER as usize,
                    SDF_RADIUS,
                    SDF_CUTOFF,
                );
                SdfGlyph {
                    bitmap,
                    width: width + 2 * SDF_BUFFER,
                    height: height + 2 * SDF_BUFFER,
                    left: img.placement.left,
                    top: img.placement.top,
                    ascender,
                    advance,
                }
            }
            _ => SdfGlyph {
                bitmap: Vec::new(),
                width: 0,
                height: 0,
                left: 0,
                top: 0,
                ascender,
                advance,
            },
        }
    }
}

/// Convert an alpha mask to SDF bytes over a grid padded by `buffer` pixels
/// on every side.
///
/// Two squared-distance grids are seeded from coverage: full pixels are
/// inside, untouched pixels are outside, and partial coverage lands between
/// the two so the reconstructed edge stays sub-pixel. After the transform,
/// signed distance is `sqrt(outer) - sqrt(inner)`.
pub fn distance_field(
    alpha: &[u8],
    width: usize,
    height: usize,
    buffer: usize,
    radius: f64,
    cutoff: f64,
) -> Vec<u8> {
    debug_assert_eq!(alpha.len(), width * height);
    let grid_width = width + 2 * buffer;
    let grid_height = height + 2 * buffer;
    let area = grid_width * grid_height;

    let mut outer = vec![INF; area];
    let mut inner = vec![0.0f64; area];
    for y in 0..height {
        for x in 0..width {
            let a = f64::from(alpha[y * width + x]) / 255.0;
            if a == 0.0 {
                continue;
            }
            let i = (y + buffer) * grid_width + (x + buffer);
            if a == 1.0 {
                outer[i] = 0.0;
                inner[i] = INF;
            } else {
                outer[i] = (0.5 - a).max(0.0).powi(2);
                inner[i] = (a - 0.5).max(0.0).powi(2);
            }
        }
    }

    edt(&mut outer, grid_width, grid_height);
    edt(&mut inner, grid_width, grid_height);

    (0..area)
        .map(|i| {
            let distance = outer[i].sqrt() - inner[i].sqrt();
            let value = 255.0 - 255.0 * (distance / radius + cutoff);
            value.round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// Squared Euclidean distance transform, columns then rows.
fn edt(grid: &mut [f64], width: usize, height: usize) {
    let max = width.max(height);
    let mut f = vec![0.0f64; max];
    let mut v = vec![0usize; max];
    let mut z = vec![0.0f64; max + 1];

    for x in 0..width {
        edt1d(grid, x, width, height, &mut f, &mut v, &mut z);
    }
    for y in 0..height {
        edt1d(grid, y * width, 1, width, &mut f, &mut v, &mut z);
    }
}

/// One-dimensional transform along a strided line: lower envelope of the
/// parabolas rooted at each sample.
fn edt1d(
    grid: &mut [f64],
    offset: usize,
    stride: usize,
    length: usize,
    f: &mut [f64],
    v: &mut [usize],
    z: &mut [f64],
) {
    v[0] = 0;
    z[0] = -INF;
    z[1] = INF;
    f[0] = grid[offset];

    let mut k: isize = 0;
    for q in 1..length {
        f[q] = grid[offset + q * stride];
        let q2 = (q * q) as f64;
        let s = loop {
            let r = v[k as usize];
            let s = (f[q] - f[r] + q2 - (r * r) as f64) / ((q - r) as f64) / 2.0;
            if s > z[k as usize] {
                break s;
            }
            k -= 1;
            if k < 0 {
                break s;
            }
        };
        k += 1;
        v[k as usize] = q;
        z[k as usize] = s;
        z[k as usize + 1] = INF;
    }

    let mut k = 0;
    for q in 0..length {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let r = v[k];
        let qr = q as f64 - r as f64;
        grid[offset + q * stride] = f[r] + qr * qr;
    }
}
