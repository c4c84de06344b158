//! Rendering module for xstitch.
//!
//! This module turns quantized grids into chart images and legends, and
//! handles reading and writing raster files.

mod bitmap_font;
mod glyph;
mod image_io;
mod legend;
mod pattern;

pub use bitmap_font::BitmapFont;
pub use glyph::{Glyph, GlyphSource, TrueTypeFont};
pub use image_io::{encode_image, open_image, write_atomic, write_image, write_images};
pub use legend::{Legend, LegendEntry};
pub use pattern::{scale_cells, Charts, PatternRenderer, GLYPH_MARGIN};
