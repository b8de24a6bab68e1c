//! Lumen math - vectors, rays, intervals and bounding boxes.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
pub mod sampling;
mod transform;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;
pub use vector::{near_zero, reflect, refract, Color};
