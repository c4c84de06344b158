//! The cross-stitch pipeline: pixelate, quantize, render.

use image::RgbImage;

use crate::error::Result;
use crate::quantize::quantize;
use crate::render::{Charts, GlyphSource, Legend, PatternRenderer};
use crate::resample::{pixelate, Filter};
use crate::types::{Palette, QuantizedGrid};

/// Settings for turning an image into charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Stitches along the shorter side of the pattern.
    pub minimum_size: u32,
    /// Chart pixels per stitch.
    pub cell_size: u32,
    /// Grid line width in pixels; 0 disables grid lines.
    pub grid_width: u32,
    pub dither: bool,
    pub filter: Filter,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            minimum_size: 100,
            cell_size: 16,
            grid_width: 1,
            dither: false,
            filter: Filter::default(),
        }
    }
}

/// A pattern built from one image and palette.
#[derive(Debug, Clone)]
pub struct CrossStitch {
    pixelated: RgbImage,
    grid: QuantizedGrid,
    palette: Palette,
    options: ChartOptions,
}

impl CrossStitch {
    /// Pixelate `image` to the stitch grid and quantize it to `palette`.
    pub fn new(image: &RgbImage, palette: Palette, options: &ChartOptions) -> Result<Self> {
        let pixelated = pixelate(image, options.minimum_size, options.filter)?;
        let grid = quantize(&pixelated, &palette, options.dither)?;

        Ok(Self {
            pixelated,
            grid,
            palette,
            options: *options,
        })
    }

    /// The downsampled image before quantization.
    pub fn pixelated(&self) -> &RgbImage {
        &self.pixelated
    }

    pub fn grid(&self) -> &QuantizedGrid {
        &self.grid
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Render the real-colour key and the grid key.
    pub fn charts(&self, glyphs: &dyn GlyphSource) -> Result<Charts> {
        PatternRenderer::new(glyphs, self.options.cell_size, self.options.grid_width)?
            .render(&self.grid, &self.palette)
    }

    /// Stitch counts per colour.
    pub fn legend(&self) -> Result<Legend> {
        Legend::from_grid(&self.grid, &self.palette)
    }
}
