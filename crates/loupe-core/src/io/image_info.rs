use std::path::{Path, PathBuf};

use crate::error::{LoupeError, Result};
use crate::geometry::Size;

/// Metadata the engine needs about an image; pixels are decoded elsewhere.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn dimensions(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Read image dimensions from the file header without decoding pixels.
pub fn read_image_info(path: &Path) -> Result<ImageInfo> {
    let (width, height) = image::image_dimensions(path)?;
    if width == 0 || height == 0 {
        return Err(LoupeError::InvalidDimensions { width, height });
    }
    Ok(ImageInfo {
        path: path.to_path_buf(),
        width,
        height,
    })
}
