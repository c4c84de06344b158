//! Palette of symbol-tagged reference colours.
//!
//! A palette is an ordered, immutable list of entries. The order is the
//! index space used by quantized grids, so an entry's position never
//! changes once the palette is built. Adding an entry produces a new
//! palette.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{XsError, Result};
use crate::parser::parse_palette;

use super::Colour;

/// A single reference colour with its chart symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    symbol: char,
    colour: Colour,
    name: Option<String>,
}

impl PaletteEntry {
    /// Create a new entry.
    pub fn new(symbol: char, colour: Colour, name: Option<String>) -> Self {
        Self {
            symbol,
            colour,
            name,
        }
    }

    /// The symbol printed in this colour's chart cells.
    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// Optional label, e.g. a thread name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for PaletteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol, self.colour)?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        Ok(())
    }
}

/// An ordered collection of palette entries with unique symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Build a palette, rejecting duplicate symbols.
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.symbol) {
                return Err(XsError::InvalidParameter {
                    message: format!("Duplicate palette symbol '{}'", entry.symbol),
                    help: Some("Every palette entry needs its own symbol".to_string()),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Build a palette from bare colours, assigning symbols from
    /// [`default_symbols`] in order.
    pub fn from_colours(colours: impl IntoIterator<Item = Colour>) -> Result<Self> {
        let mut symbols = default_symbols();
        let mut entries = Vec::new();

        for colour in colours {
            let symbol = symbols.next().ok_or_else(|| XsError::InvalidParameter {
                message: format!(
                    "Too many colours: only {} default symbols are available",
                    default_symbols().count()
                ),
                help: Some("Reduce the number of colours".to_string()),
            })?;
            entries.push(PaletteEntry::new(symbol, colour, None));
        }

        Self::new(entries)
    }

    /// Generate an evenly stepped RGB cube.
    ///
    /// `step` must divide 255 so both black and white are included.
    pub fn stepped(step: u8) -> Result<Self> {
        if step == 0 || 255 % step as u32 != 0 {
            return Err(XsError::InvalidParameter {
                message: format!("255 does not divide by {}", step),
                help: Some("Use a divisor of 255 such as 0x55 or 0xff".to_string()),
            });
        }

        let levels: Vec<u8> = (0..=255u32).step_by(step as usize).map(|v| v as u8).collect();
        let mut colours = Vec::with_capacity(levels.len().pow(3));
        for &r in &levels {
            for &g in &levels {
                for &b in &levels {
                    colours.push(Colour::rgb(r, g, b));
                }
            }
        }

        Self::from_colours(colours)
    }

    /// Load and parse a palette text file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| XsError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read palette: {}", e),
        })?;

        parse_palette(&source)
    }

    /// Return a new palette with `entry` appended.
    pub fn with_entry(&self, entry: PaletteEntry) -> Result<Self> {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self::new(entries)
    }

    /// Get the entry at a palette index.
    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }

    /// Iterate over the colours in palette order.
    pub fn colours(&self) -> impl Iterator<Item = Colour> + '_ {
        self.entries.iter().map(|e| e.colour)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry tagged with `symbol`.
    pub fn lookup_by_symbol(&self, symbol: char) -> Result<&PaletteEntry> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .ok_or_else(|| XsError::NotFound {
                message: format!("Palette does not contain symbol '{}'", symbol),
            })
    }

    /// Find the first entry with exactly this colour.
    pub fn lookup_by_colour(&self, colour: Colour) -> Result<&PaletteEntry> {
        self.entries
            .iter()
            .find(|e| e.colour == colour)
            .ok_or_else(|| XsError::NotFound {
                message: format!("Palette does not contain colour {}", colour),
            })
    }

    /// Position of `entry` in palette order.
    pub fn index_of(&self, entry: &PaletteEntry) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e == entry)
            .ok_or_else(|| XsError::NotFound {
                message: format!("Palette does not contain entry '{}'", entry),
            })
    }
}

impl fmt::Display for Palette {
    /// Canonical text form, one `SYMBOL #RRGGBB NAME` line per entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Symbols handed out to entries that do not name their own.
///
/// Printable ASCII minus space and `#` (which starts comments). Every one
/// of these has its own glyph in the builtin bitmap font.
pub fn default_symbols() -> impl Iterator<Item = char> {
    ('!'..='~').filter(|&c| c != '#')
}
