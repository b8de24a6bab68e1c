//! Textures map a surface coordinate and a point in space to a color.

use std::path::Path;
use std::sync::Arc;

use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
use lumen_core::ImageData;
use lumen_math::{Color, Vec3};
use rand::RngCore;

/// Color returned by image textures that have no usable pixels.
pub const MISSING_IMAGE_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// A pure function from `(u, v, p)` to color.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern selecting between two child textures.
///
/// The pattern is `sin(10x) sin(10y) sin(10z)`, so it varies through the
/// volume rather than over the surface UVs.
#[derive(Clone)]
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// How a [`NoiseTexture`] turns Perlin noise into a gray level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseMode {
    /// Raw noise remapped to [0, 1].
    Smooth,
    /// Multi-octave turbulence.
    Turbulence,
    /// Sinusoidal stripes along z with turbulence as phase offset.
    #[default]
    Marble,
}

/// Gray Perlin-noise texture.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
    mode: NoiseMode,
}

impl NoiseTexture {
    pub fn new(scale: f32, mode: NoiseMode, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
            mode,
        }
    }

    pub fn mode(&self) -> NoiseMode {
        self.mode
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let gray = match self.mode {
            NoiseMode::Smooth => 0.5 * (1.0 + self.noise.noise(self.scale * p)),
            NoiseMode::Turbulence => self.noise.turb(self.scale * p, DEFAULT_TURBULENCE_DEPTH),
            NoiseMode::Marble => {
                0.5 * (1.0
                    + (self.scale * p.z + 10.0 * self.noise.turb(p, DEFAULT_TURBULENCE_DEPTH))
                        .sin())
            }
        };
        Color::splat(gray)
    }
}

/// Texture sampled from an image by nearest pixel.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image: Some(image) }
    }

    /// Texture with no image; every lookup returns [`MISSING_IMAGE_COLOR`].
    pub fn missing() -> Self {
        Self { image: None }
    }

    /// Load the image at `path`, degrading to [`ImageTexture::missing`] if
    /// it cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match ImageData::load(path) {
            Ok(image) => Self::new(Arc::new(image)),
            Err(err) => {
                log::warn!("Could not load texture image {}: {}", path.display(), err);
                Self::missing()
            }
        }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let Some(image) = &self.image else {
            return MISSING_IMAGE_COLOR;
        };
        if u.is_nan() || v.is_nan() {
            return MISSING_IMAGE_COLOR;
        }

        // Row 0 is the top of the image, v = 1 is the top of the surface
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let (width, height) = (image.width(), image.height());
        let i = ((u * width as f32) as u32).min(width - 1);
        let j = ((v * height as f32) as u32).min(height - 1);

        match image.pixel(i, j) {
            Some([r, g, b]) => Color::new(r as f32, g as f32, b as f32) / 255.0,
            None => MISSING_IMAGE_COLOR,
        }
    }
}
