//! xstitch - Cross-stitch pattern generator
//!
//! Turns a photograph into a stitchable pattern: the image is pixelated to
//! a small grid, every stitch is matched to the nearest colour of a thread
//! palette, and two charts are drawn: a real-colour key with symbols and a
//! printable black-and-white symbol grid.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xstitch::{load_palette, open_image, render_charts, BitmapFont, ChartOptions};
//!
//! let image = open_image(Path::new("photo.jpg"))?;
//! let palette = load_palette(Path::new("dmc.txt"))?;
//! let charts = render_charts(&image, &palette, &ChartOptions::default(), &BitmapFont)?;
//! println!("{}x{}", charts.grid.width(), charts.grid.height());
//! # Ok::<(), xstitch::XsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod quantize;
pub mod render;
pub mod resample;
pub mod session;
pub mod stitch;
pub mod types;

pub use config::{Config, CONFIG_FILENAME};
pub use error::{Result, XsError};
pub use parser::parse_palette;
pub use quantize::{nearest, quantize};
pub use render::{
    BitmapFont, Charts, Glyph, GlyphSource, Legend, LegendEntry, PatternRenderer, TrueTypeFont,
};
pub use resample::{
    aspect_crop, crop, pixelate, remove_gutter, resize, resize_aspect, CropRect, Filter,
    FilterKind,
};
pub use session::{load_palette, open_image, render_charts, Session};
pub use stitch::{ChartOptions, CrossStitch};
pub use types::{Colour, Palette, PaletteEntry, QuantizedGrid};
