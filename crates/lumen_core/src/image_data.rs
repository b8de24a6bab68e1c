//! Decoded texture images.
//!
//! Images are decoded once, before rendering, into an immutable 8-bit RGB
//! buffer that image textures sample from.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading a texture image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image {0} has no pixels")]
    EmptyImage(String),
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A width x height x 3-channel 8-bit image, row-major, row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// Wrap raw RGB bytes. Returns `None` if the buffer size does not match
    /// or is not addressable.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))?;
        if expected == 0 || data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Decode an image file of any format the `image` crate understands.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        if width == 0 || height == 0 {
            return Err(ImageError::EmptyImage(path.display().to_string()));
        }

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            rgb.as_raw().len() as f32 / 1024.0
        );

        Ok(Self {
            width,
            height,
            data: rgb.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes of the pixel at column `x`, row `y`, or `None` if outside.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        let p = self.data.get(idx..idx + 3)?;
        Some([p[0], p[1], p[2]])
    }
}
