//! Raster file input and output.
//!
//! Outputs are encoded into a temporary file beside the destination and
//! renamed into place once complete, so a failed write never leaves a
//! partial file behind. `write_images` stages a whole set of outputs
//! before renaming any of them.

use std::fs;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::NamedTempFile;

use crate::error::{XsError, Result};

/// Open an image file and convert it to 8-bit RGB.
pub fn open_image(path: &Path) -> Result<RgbImage> {
    if !path.exists() {
        return Err(XsError::Io {
            path: path.to_path_buf(),
            message: "File does not exist".to_string(),
        });
    }

    let image = image::open(path).map_err(|e| XsError::Image {
        path: path.to_path_buf(),
        message: format!("Failed to decode image: {}", e),
    })?;

    Ok(image.to_rgb8())
}

/// Write an image, choosing the format from the file extension.
pub fn write_image(image: &DynamicImage, path: &Path) -> Result<()> {
    write_images(&[(image, path)])
}

/// Write several images as one step.
///
/// Every image is encoded and staged beside its destination before any
/// destination is replaced, so an unsupported extension or a failed encode
/// leaves all of them untouched.
pub fn write_images(images: &[(&DynamicImage, &Path)]) -> Result<()> {
    let mut encoded = Vec::with_capacity(images.len());
    for &(image, path) in images {
        encoded.push((encode_image(image, path)?, path));
    }

    let mut staged = Vec::with_capacity(encoded.len());
    for (bytes, path) in &encoded {
        let temp = stage(path, |writer| {
            writer.write_all(bytes)?;
            Ok(())
        })?;
        staged.push((temp, *path));
    }

    for (temp, path) in staged {
        persist(temp, path)?;
    }
    Ok(())
}

/// Encode an image in the format named by `path`'s extension.
pub fn encode_image(image: &DynamicImage, path: &Path) -> Result<Vec<u8>> {
    let format = ImageFormat::from_path(path).map_err(|e| XsError::Image {
        path: path.to_path_buf(),
        message: format!("Unsupported output format: {}", e),
    })?;

    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .map_err(|e| XsError::Image {
            path: path.to_path_buf(),
            message: format!("Failed to encode image: {}", e),
        })?;
    Ok(cursor.into_inner())
}

/// Write a file through `write`, replacing `path` only if every step
/// succeeds.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let temp = stage(path, write)?;
    persist(temp, path)
}

/// Write into a temporary file in `path`'s directory.
fn stage<F>(path: &Path, write: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| XsError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }

    let temp = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    let mut writer = BufWriter::new(temp);
    write(&mut writer)?;

    writer.into_inner().map_err(|e| write_error(path, e.into_error()))
}

fn persist(temp: NamedTempFile, path: &Path) -> Result<()> {
    temp.persist(path).map_err(|e| write_error(path, e.error))?;
    Ok(())
}

fn write_error(path: &Path, e: std::io::Error) -> XsError {
    XsError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write file: {}", e),
    }
}
