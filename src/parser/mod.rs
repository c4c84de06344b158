//! Parser for palette text files.

mod palette;

pub use palette::parse_palette;
