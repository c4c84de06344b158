//! Chart legend: which symbol means which colour, and how many stitches
//! of each the pattern needs.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::types::{Palette, QuantizedGrid};

use super::image_io::write_atomic;

/// One used palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub symbol: char,
    /// `#rrggbb`
    pub colour: String,
    pub name: Option<String>,
    pub count: usize,
}

/// Stitch counts for a quantized pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub width: u32,
    pub height: u32,
    pub stitches: usize,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Count stitches per palette entry. Unused entries are left out;
    /// the rest stay in palette order.
    pub fn from_grid(grid: &QuantizedGrid, palette: &Palette) -> Result<Self> {
        grid.check_palette(palette)?;

        let mut counts = vec![0usize; palette.len()];
        for &index in grid.indices() {
            counts[index] += 1;
        }

        let entries = palette
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(entry, count)| LegendEntry {
                symbol: entry.symbol(),
                colour: entry.colour().to_string(),
                name: entry.name().map(str::to_string),
                count,
            })
            .collect();

        Ok(Self {
            width: grid.width(),
            height: grid.height(),
            stitches: grid.indices().len(),
            entries,
        })
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(std::io::Error::from)?)
    }

    /// Write the JSON legend to a file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        write_atomic(path, |w| {
            w.write_all(json.as_bytes())?;
            w.write_all(b"\n")?;
            Ok(())
        })
    }
}
