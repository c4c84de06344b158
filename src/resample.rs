//! Geometric resampling.
//!
//! Pixelating down to a stitch grid, trimming a percentage gutter, and
//! resizing to an exact size by cropping to the target aspect first.
//! Every operation returns a new image.

use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{XsError, Result};

/// A resampling kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Nearest neighbour, keeps hard edges
    Nearest,
    /// Linear
    Triangle,
    /// Cubic (Catmull-Rom)
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<FilterKind> for FilterType {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Nearest => FilterType::Nearest,
            FilterKind::Triangle => FilterType::Triangle,
            FilterKind::CatmullRom => FilterType::CatmullRom,
            FilterKind::Gaussian => FilterType::Gaussian,
            FilterKind::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// How a kernel is chosen for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Always use the same kernel.
    Fixed(FilterKind),
    /// Pick by direction: `shrink` when the output has fewer pixels,
    /// `enlarge` otherwise.
    Directional {
        shrink: FilterKind,
        enlarge: FilterKind,
    },
}

impl Default for Filter {
    fn default() -> Self {
        Filter::Directional {
            shrink: FilterKind::CatmullRom,
            enlarge: FilterKind::Nearest,
        }
    }
}

impl Filter {
    /// The kernel to use for a resize from `from` to `to`.
    pub fn select(self, from: (u32, u32), to: (u32, u32)) -> FilterKind {
        match self {
            Filter::Fixed(kind) => kind,
            Filter::Directional { shrink, enlarge } => {
                let before = from.0 as u64 * from.1 as u64;
                let after = to.0 as u64 * to.1 as u64;
                if after < before {
                    shrink
                } else {
                    enlarge
                }
            }
        }
    }
}

/// A crop rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from two opposite corners in any order.
    pub fn from_corners(a: (u32, u32), b: (u32, u32)) -> Self {
        let (x1, x2) = (a.0.min(b.0), a.0.max(b.0));
        let (y1, y2) = (a.1.min(b.1), a.1.max(b.1));
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Restrict the rectangle to a `width` × `height` image.
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self::new(
            x,
            y,
            self.width.min(width - x),
            self.height.min(height - y),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Crop an image to `rect`, clamped to the image bounds.
pub fn crop(image: &RgbImage, rect: CropRect) -> Result<RgbImage> {
    let rect = rect.clamp_to(image.width(), image.height());
    if rect.is_empty() {
        return Err(XsError::InvalidParameter {
            message: format!(
                "Crop {}x{} at ({}, {}) leaves nothing of a {}x{} image",
                rect.width,
                rect.height,
                rect.x,
                rect.y,
                image.width(),
                image.height()
            ),
            help: None,
        });
    }

    Ok(imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
}

/// Resize to exactly `width` × `height` with a kernel picked by `filter`.
pub fn resize(image: &RgbImage, width: u32, height: u32, filter: Filter) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    let kind = filter.select(image.dimensions(), (width, height));
    imageops::resize(image, width, height, kind.into())
}

/// Scale so the shorter side becomes `minimum` pixels (one pixel per stitch).
pub fn pixelate(image: &RgbImage, minimum: u32, filter: Filter) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if minimum == 0 {
        return Err(XsError::invalid("Minimum dimension must be at least 1"));
    }
    if width == 0 || height == 0 {
        return Err(XsError::invalid(format!(
            "Cannot pixelate an empty {}x{} image",
            width, height
        )));
    }

    let scale = minimum as f64 / width.min(height) as f64;
    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);

    Ok(resize(image, new_width, new_height, filter))
}

/// Remove `percent`% of the shorter side from every edge.
pub fn remove_gutter(image: &RgbImage, percent: f64) -> Result<RgbImage> {
    if !percent.is_finite() || percent < 0.0 {
        return Err(XsError::invalid(format!("Invalid gutter percentage {}", percent)));
    }

    let (width, height) = image.dimensions();
    let gutter = (width.min(height) as f64 * percent / 100.0).round() as i64;
    let new_width = width as i64 - 2 * gutter;
    let new_height = height as i64 - 2 * gutter;

    if new_width <= 0 || new_height <= 0 {
        return Err(XsError::InvalidParameter {
            message: format!(
                "A {}% gutter leaves nothing of a {}x{} image",
                percent, width, height
            ),
            help: Some("Use a gutter below 50%".to_string()),
        });
    }

    let g = gutter as u32;
    Ok(imageops::crop_imm(image, g, g, new_width as u32, new_height as u32).to_image())
}

/// The centred region of a `width` × `height` image with the aspect ratio
/// of `target_width` × `target_height`.
pub fn aspect_crop(
    width: u32,
    height: u32,
    target_width: u32,
    target_height: u32,
) -> Result<CropRect> {
    if target_width == 0 || target_height == 0 {
        return Err(XsError::invalid(format!(
            "Target size {}x{} must be positive",
            target_width, target_height
        )));
    }
    if width == 0 || height == 0 {
        return Err(XsError::invalid(format!(
            "Cannot resize an empty {}x{} image",
            width, height
        )));
    }

    let (w, h) = (width as u64, height as u64);
    let (tw, th) = (target_width as u64, target_height as u64);

    let rect = match (w * th).cmp(&(h * tw)) {
        std::cmp::Ordering::Greater => {
            // Too wide: trim left and right
            let keep = ((2 * h * tw + th) / (2 * th)).clamp(1, w);
            CropRect::new(((w - keep) / 2) as u32, 0, keep as u32, height)
        }
        std::cmp::Ordering::Less => {
            // Too tall: trim top and bottom
            let keep = ((2 * w * th + tw) / (2 * tw)).clamp(1, h);
            CropRect::new(0, ((h - keep) / 2) as u32, width, keep as u32)
        }
        std::cmp::Ordering::Equal => CropRect::new(0, 0, width, height),
    };

    Ok(rect)
}

/// Resize to exactly `target_width` × `target_height`, cropping equal
/// margins from the long axis so nothing is stretched.
pub fn resize_aspect(
    image: &RgbImage,
    target_width: u32,
    target_height: u32,
    filter: Filter,
) -> Result<RgbImage> {
    let rect = aspect_crop(image.width(), image.height(), target_width, target_height)?;
    let cropped = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();

    Ok(resize(&cropped, target_width, target_height, filter))
}
