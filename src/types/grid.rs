//! Grid of palette indices produced by quantization.

use image::RgbImage;

use crate::error::{XsError, Result};

use super::Palette;

/// A width × height grid of palette indices (row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedGrid {
    width: u32,
    height: u32,
    indices: Vec<usize>,
}

impl QuantizedGrid {
    /// Create a grid from row-major indices.
    pub fn new(width: u32, height: u32, indices: Vec<usize>) -> Result<Self> {
        if indices.len() != width as usize * height as usize {
            return Err(XsError::invalid(format!(
                "Grid of {}x{} needs {} indices, got {}",
                width,
                height,
                width as usize * height as usize,
                indices.len()
            )));
        }

        Ok(Self {
            width,
            height,
            indices,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the palette index of a cell.
    pub fn get(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.indices.get((y * self.width + x) as usize).copied()
    }

    /// Row-major indices.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate over cells as `(x, y, index)`, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, usize)> + '_ {
        let width = self.width.max(1);
        self.indices
            .iter()
            .enumerate()
            .map(move |(i, &index)| (i as u32 % width, i as u32 / width, index))
    }

    /// Check that every index addresses an entry of `palette`.
    pub fn check_palette(&self, palette: &Palette) -> Result<()> {
        match self.indices.iter().find(|&&i| i >= palette.len()) {
            Some(&index) => Err(XsError::InvalidParameter {
                message: format!(
                    "Grid index {} is outside a palette of {} colours",
                    index,
                    palette.len()
                ),
                help: Some("Quantize against the palette used for rendering".to_string()),
            }),
            None => Ok(()),
        }
    }

    /// Map each cell back to its palette colour, one pixel per cell.
    pub fn to_image(&self, palette: &Palette) -> Result<RgbImage> {
        self.check_palette(palette)?;
        let colours: Vec<_> = palette.colours().collect();

        Ok(RgbImage::from_fn(self.width, self.height, |x, y| {
            colours[self.indices[(y * self.width + x) as usize]].into()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, PaletteEntry};

    fn two_tone() -> Palette {
        Palette::new(vec![
            PaletteEntry::new('.', Colour::BLACK, None),
            PaletteEntry::new('o', Colour::WHITE, None),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_checks_length() {
        assert!(QuantizedGrid::new(2, 2, vec![0; 4]).is_ok());
        assert!(QuantizedGrid::new(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn test_get() {
        let grid = QuantizedGrid::new(2, 1, vec![0, 1]).unwrap();
        assert_eq!(grid.get(0, 0), Some(0));
        assert_eq!(grid.get(1, 0), Some(1));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 1), None);
    }

    #[test]
    fn test_cells_row_major() {
        let grid = QuantizedGrid::new(2, 2, vec![0, 1, 1, 0]).unwrap();
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells, vec![(0, 0, 0), (1, 0, 1), (0, 1, 1), (1, 1, 0)]);
    }

    #[test]
    fn test_to_image() {
        let grid = QuantizedGrid::new(2, 1, vec![1, 0]).unwrap();
        let img = grid.to_image(&two_tone()).unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_to_image_rejects_foreign_index() {
        let grid = QuantizedGrid::new(1, 1, vec![2]).unwrap();
        assert!(grid.to_image(&two_tone()).is_err());
    }
}
