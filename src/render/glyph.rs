//! Glyph sources for chart symbols.
//!
//! A [`GlyphSource`] turns a palette symbol into a binary coverage bitmap
//! sized for a chart cell. The builtin [`BitmapFont`] needs no files;
//! [`TrueTypeFont`] renders any TTF/OTF font.

use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};

use crate::error::{XsError, Result};

/// A rasterised symbol: each pixel is either set (255) or clear (0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    width: u32,
    height: u32,
    /// Rows of empty space between the top of the line and the ink.
    top: u32,
    coverage: Vec<u8>,
}

impl Glyph {
    /// Create a glyph from row-major coverage.
    ///
    /// Any non-zero coverage counts as set.
    pub fn new(width: u32, height: u32, top: u32, coverage: Vec<u8>) -> Self {
        debug_assert_eq!(coverage.len(), (width * height) as usize);
        let coverage = coverage
            .into_iter()
            .map(|c| if c > 0 { 255 } else { 0 })
            .collect();
        Self {
            width,
            height,
            top,
            coverage,
        }
    }

    /// A glyph with no ink (space, or a symbol the font cannot draw).
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            top: 0,
            coverage: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    /// Check if the pixel at `(x, y)` is inked.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width
            && y < self.height
            && self.coverage[(y * self.width + x) as usize] > 0
    }

    /// Number of inked pixels.
    pub fn ink(&self) -> usize {
        self.coverage.iter().filter(|&&c| c > 0).count()
    }
}

/// Something that can draw palette symbols.
pub trait GlyphSource {
    /// Rasterise `symbol` for a cell of `cell_size` pixels.
    fn rasterize(&self, symbol: char, cell_size: u32) -> Glyph;
}

/// A TrueType/OpenType font.
pub struct TrueTypeFont {
    font: FontVec,
}

impl TrueTypeFont {
    /// Symbol height as a fraction of the cell.
    const CELL_FRACTION: f32 = 0.6;

    /// Load a font file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| XsError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read font: {}", e),
        })?;

        Self::from_bytes(data).map_err(|e| XsError::Font {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Parse font data.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|e| XsError::Font {
            message: e.to_string(),
        })?;
        Ok(Self { font })
    }
}

impl GlyphSource for TrueTypeFont {
    fn rasterize(&self, symbol: char, cell_size: u32) -> Glyph {
        let scale = PxScale::from((cell_size as f32 * Self::CELL_FRACTION).max(4.0));
        let ascent = self.font.as_scaled(scale).ascent();
        let glyph = self
            .font
            .glyph_id(symbol)
            .with_scale_and_position(scale, point(0.0, ascent));

        let Some(outlined) = self.font.outline_glyph(glyph) else {
            return Glyph::empty();
        };

        let bounds = outlined.px_bounds();
        let width = bounds.width().max(0.0) as u32;
        let height = bounds.height().max(0.0) as u32;
        let mut coverage = vec![0u8; (width * height) as usize];

        // Threshold at half coverage so masks stay binary
        outlined.draw(|x, y, c| {
            if x < width && y < height && c >= 0.5 {
                coverage[(y * width + x) as usize] = 255;
            }
        });

        Glyph::new(width, height, bounds.min.y.max(0.0) as u32, coverage)
    }
}
