//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over an immutable scene of spheres,
//! axis-aligned rectangles and boxes, instancing decorators and a BVH,
//! shaded by textured diffuse, metal, glass and emissive materials.

mod aarect;
mod bucket;
mod bvh;
mod camera;
mod hittable;
mod instance;
mod material;
pub mod perlin;
mod renderer;
mod sphere;
mod texture;

pub use aarect::{AaBox, AaRect, Plane};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{BvhError, BvhNode};
pub use camera::{Camera, CameraBuilder};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{RotateY, Translate};
pub use material::{Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, Background, ImageBuffer,
    RenderConfig, T_MIN,
};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{
    CheckerTexture, ImageTexture, NoiseMode, NoiseTexture, SolidColor, Texture,
    MISSING_IMAGE_COLOR,
};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
