//! Entry points for interactive front ends.
//!
//! An editor opens an image, lets the user crop it, loads a palette and
//! asks for charts. None of this depends on any UI state; the editor owns
//! the window, the [`Session`] owns the pixels.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::Result;
use crate::render::{self, Charts, GlyphSource};
use crate::resample::{crop, CropRect};
use crate::stitch::{ChartOptions, CrossStitch};
use crate::types::Palette;

/// Open an image as RGB.
pub fn open_image(path: &Path) -> Result<RgbImage> {
    render::open_image(path)
}

/// Load a palette text file.
pub fn load_palette(path: &Path) -> Result<Palette> {
    Palette::load(path)
}

/// Run the whole pipeline on an image and return both charts.
pub fn render_charts(
    image: &RgbImage,
    palette: &Palette,
    options: &ChartOptions,
    glyphs: &dyn GlyphSource,
) -> Result<Charts> {
    CrossStitch::new(image, palette.clone(), options)?.charts(glyphs)
}

/// An opened image and its current crop.
#[derive(Debug, Clone)]
pub struct Session {
    path: Option<PathBuf>,
    original: RgbImage,
    image: RgbImage,
}

impl Session {
    /// Start a session on an image file.
    pub fn open(path: &Path) -> Result<Self> {
        let original = open_image(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            image: original.clone(),
            original,
        })
    }

    /// Start a session on an image already in memory.
    pub fn from_image(image: RgbImage) -> Self {
        Self {
            path: None,
            image: image.clone(),
            original: image,
        }
    }

    /// The file the image came from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The image as currently cropped.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// The image as opened.
    pub fn original(&self) -> &RgbImage {
        &self.original
    }

    /// Crop the current image. The rectangle is clamped to the image;
    /// if nothing is left the image stays as it was.
    pub fn set_crop(&mut self, rect: CropRect) -> Result<()> {
        self.image = crop(&self.image, rect)?;
        Ok(())
    }

    /// Undo every crop.
    pub fn reset_crop(&mut self) {
        self.image = self.original.clone();
    }

    /// Render charts from the current image.
    pub fn render_charts(
        &self,
        palette: &Palette,
        options: &ChartOptions,
        glyphs: &dyn GlyphSource,
    ) -> Result<Charts> {
        render_charts(&self.image, palette, options, glyphs)
    }
}
