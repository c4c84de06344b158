//! Pattern renderer - turns a quantized grid into chart images.
//!
//! Both charts share one symbol mask: glyphs centred in every cell plus
//! grid lines on the internal cell boundaries. The real-colour key paints
//! the mask in key-shifted palette colours over the true stitch colours;
//! the grid key is the mask inverted for printing.

use std::collections::HashMap;

use image::{imageops, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::error::{XsError, Result};
use crate::types::{Colour, Palette, QuantizedGrid};

use super::glyph::{Glyph, GlyphSource};

/// Space above a symbol in its cell.
pub const GLYPH_MARGIN: u32 = 4;

const INK: Luma<u8> = Luma([255]);

/// The two chart images for one pattern.
#[derive(Debug, Clone)]
pub struct Charts {
    /// True colours with key-coloured symbols.
    pub real_color: RgbImage,
    /// Black symbols and grid lines on white.
    pub grid: GrayImage,
}

/// Chart renderer configuration.
pub struct PatternRenderer<'a> {
    glyphs: &'a dyn GlyphSource,
    cell_size: u32,
    grid_width: u32,
}

impl<'a> PatternRenderer<'a> {
    /// Create a renderer drawing `cell_size` pixel cells and grid lines
    /// `grid_width` pixels wide (0 for none).
    pub fn new(glyphs: &'a dyn GlyphSource, cell_size: u32, grid_width: u32) -> Result<Self> {
        if cell_size == 0 {
            return Err(XsError::invalid("Cell size must be at least 1 pixel"));
        }

        Ok(Self {
            glyphs,
            cell_size,
            grid_width,
        })
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn grid_width(&self) -> u32 {
        self.grid_width
    }

    /// Output size for a grid.
    pub fn chart_size(&self, grid: &QuantizedGrid) -> (u32, u32) {
        (grid.width() * self.cell_size, grid.height() * self.cell_size)
    }

    /// Render both charts from a single mask.
    pub fn render(&self, grid: &QuantizedGrid, palette: &Palette) -> Result<Charts> {
        let mask = self.symbol_mask(grid, palette)?;
        let real_color = self.composite(grid, palette, &mask);

        let mut inverted = mask;
        imageops::invert(&mut inverted);

        Ok(Charts {
            real_color,
            grid: inverted,
        })
    }

    /// Single-channel mask: 255 on glyph and grid line pixels, 0 elsewhere.
    ///
    /// Grid lines are drawn last, over any glyph pixels they cross.
    pub fn symbol_mask(&self, grid: &QuantizedGrid, palette: &Palette) -> Result<GrayImage> {
        grid.check_palette(palette)?;

        let cs = self.cell_size;
        let (width, height) = self.chart_size(grid);
        let mut mask = GrayImage::new(width, height);

        let mut glyphs: HashMap<usize, Glyph> = HashMap::new();

        for (cx, cy, index) in grid.cells() {
            let glyph = glyphs.entry(index).or_insert_with(|| {
                let symbol = palette.entries()[index].symbol();
                self.glyphs.rasterize(symbol, cs)
            });

            let margin = GLYPH_MARGIN.min(cs.saturating_sub(glyph.height()));
            let left = cx * cs;
            let top = cy * cs;
            let x0 = left + cs.saturating_sub(glyph.width()) / 2;
            let y0 = top + margin + glyph.top();

            // Clip to the cell
            for gy in 0..glyph.height() {
                let y = y0 + gy;
                if y >= top + cs {
                    break;
                }
                for gx in 0..glyph.width() {
                    let x = x0 + gx;
                    if x >= left + cs {
                        break;
                    }
                    if glyph.is_set(gx, gy) {
                        mask.put_pixel(x, y, INK);
                    }
                }
            }
        }

        if self.grid_width > 0 {
            self.draw_grid_lines(&mut mask, grid);
        }

        Ok(mask)
    }

    /// Real-colour key: key-shifted colours where the mask is set, true
    /// stitch colours elsewhere.
    pub fn real_color_key(&self, grid: &QuantizedGrid, palette: &Palette) -> Result<RgbImage> {
        let mask = self.symbol_mask(grid, palette)?;
        Ok(self.composite(grid, palette, &mask))
    }

    /// Grid key: the symbol mask inverted, dark ink on white.
    pub fn grid_key(&self, grid: &QuantizedGrid, palette: &Palette) -> Result<GrayImage> {
        let mut mask = self.symbol_mask(grid, palette)?;
        imageops::invert(&mut mask);
        Ok(mask)
    }

    fn draw_grid_lines(&self, mask: &mut GrayImage, grid: &QuantizedGrid) {
        let (width, height) = mask.dimensions();
        let line = self.grid_width;
        let offset = (line / 2) as i32;

        for col in 1..grid.width() {
            let x = (col * self.cell_size) as i32 - offset;
            draw_filled_rect_mut(mask, Rect::at(x, 0).of_size(line, height), INK);
        }
        for row in 1..grid.height() {
            let y = (row * self.cell_size) as i32 - offset;
            draw_filled_rect_mut(mask, Rect::at(0, y).of_size(width, line), INK);
        }
    }

    fn composite(&self, grid: &QuantizedGrid, palette: &Palette, mask: &GrayImage) -> RgbImage {
        let colours: Vec<Colour> = palette.colours().collect();
        let keys: Vec<Colour> = colours.iter().map(|c| c.key_shift()).collect();

        let background = scale_cells(grid, &colours, self.cell_size);
        let foreground = scale_cells(grid, &keys, self.cell_size);

        RgbImage::from_fn(background.width(), background.height(), |x, y| {
            if mask.get_pixel(x, y)[0] > 0 {
                *foreground.get_pixel(x, y)
            } else {
                *background.get_pixel(x, y)
            }
        })
    }
}

/// Nearest-neighbour upscale of a grid: each cell becomes a `scale` ×
/// `scale` block of its colour.
///
/// Indices must already be checked against `colours`.
pub fn scale_cells(grid: &QuantizedGrid, colours: &[Colour], scale: u32) -> RgbImage {
    let scale = scale.max(1);
    RgbImage::from_fn(grid.width() * scale, grid.height() * scale, |x, y| {
        let index = grid.get(x / scale, y / scale).unwrap_or(0);
        Rgb::from(colours[index])
    })
}
