//! Core domain types for xstitch.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - RGB colour values
//! - `Palette` - Ordered, symbol-tagged reference colours
//! - `QuantizedGrid` - Palette indices for every stitch

mod colour;
mod grid;
mod palette;

pub use colour::{Colour, KEY_SHIFT};
pub use grid::QuantizedGrid;
pub use palette::{default_symbols, Palette, PaletteEntry};
