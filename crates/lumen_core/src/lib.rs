//! Lumen Core - image input and output around the renderer.
//!
//! This crate provides:
//!
//! - **Texture images**: `ImageData`, decoded once into an 8-bit RGB buffer
//! - **PPM output**: writing and parsing plain-text `P3` images
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::ppm::write_ppm;
//!
//! let pixels = vec![[255, 0, 0]; 4];
//! write_ppm(&mut std::io::stdout(), 2, 2, &pixels)?;
//! ```

pub mod image_data;
pub mod ppm;

// Re-export commonly used types
pub use image_data::{ImageData, ImageError};
pub use ppm::{parse_ppm, write_ppm, PpmError, PpmImage};
