//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by a maximum depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Bucket-parallel rendering with per-bucket seeding

use std::time::Instant;

use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Color, Hittable, Ray};
use lumen_math::sampling::gen_f32;
use lumen_math::Interval;
use rand::RngCore;

/// Minimum hit distance; keeps scattered rays from re-hitting the surface
/// they start on.
pub const T_MIN: f32 = 0.001;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Constant color.
    Color(Color),
    /// Vertical white-to-blue gradient.
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Color(color) => *color,
            Background::Sky => sky_gradient(ray),
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub background: Background,
    /// Base seed; every bucket derives its own stream from it
    pub seed: u64,
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::Sky,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce budget exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::from(T_MIN)) else {
        return background.color(ray);
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed: the path ends with whatever it emitted
        None => emission,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGB.
///
/// Channels are gamma corrected, clamped to [0, 0.999] and scaled by 256.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let channel = |c: f32| (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` counts rows from the top of the image; the camera's viewport
/// coordinates count from the bottom.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width = config.image_width as f32;
    let height = config.image_height as f32;
    let row_from_bottom = (config.image_height - 1 - y) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width;
        let t = (row_from_bottom + gen_f32(rng)) / height;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, &config.background, rng);
    }

    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// Simple image buffer for storing render output. Row 0 is the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Gamma-corrected 8-bit pixels, top row first.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|c| color_to_rgb(*c)).collect()
    }
}

/// Render the entire scene to an image buffer.
///
/// Buckets run in parallel on the current rayon pool. The output depends
/// only on the scene, camera and config, not on the thread count.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(config.image_width, config.image_height, config.bucket_size);

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} buckets",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, world, config))
        .collect();

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aarect::AaRect;
    use crate::hittable::{HitRecord, HittableList};
    use crate::material::{Lambertian, Metal};
    use crate::sphere::Sphere;
    use crate::{Aabb, BvhNode, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn pinhole() -> Camera {
        Camera::builder().with_aspect_ratio(1.0).build()
    }

    /// Forwards to a world and counts intersection queries.
    struct Counting<'w> {
        world: &'w dyn Hittable,
        queries: AtomicUsize,
    }

    impl Hittable for Counting<'_> {
        fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
            self.queries.fetch_add(1, Ordering::Relaxed);
            self.world.hit(ray, ray_t)
        }

        fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
            self.world.bounding_box(time0, time1)
        }
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new_simple(Vec3::ZERO, Vec3::Y));
        let down = sky_gradient(&Ray::new_simple(Vec3::ZERO, Vec3::NEG_Y));

        assert_eq!(up, Color::new(0.5, 0.7, 1.0));
        assert_eq!(down, Color::ONE);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-0.5), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::splat(4.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(0.25, -1.0, f32::NAN)), [128, 0, 0]);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        let color = ray_color(&ray, &world, 0, &Background::Color(Color::ONE), &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_ground_sphere_scene() {
        let _ = env_logger::builder().is_test(true).try_init();

        let ground = Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        );
        let world = BvhNode::new(vec![Arc::new(ground)], 0.0, 1.0).unwrap();
        let config = RenderConfig {
            image_width: 2,
            image_height: 2,
            samples_per_pixel: 32,
            max_depth: 10,
            background: Background::Sky,
            seed: 42,
            bucket_size: 1,
        };

        let image = render(&pinhole(), &world, &config);
        for x in 0..2 {
            let top = image.get(x, 0);
            let bottom = image.get(x, 1);
            // Top row sees sky, bottom row is darkened by the diffuse ground
            assert!(bottom.x < top.x && bottom.y < top.y && bottom.z < top.z);
            assert!(top.x > 0.5);
        }

        // Same seed, same image
        assert_eq!(render(&pinhole(), &world, &config), image);
    }

    #[test]
    fn test_empty_scene_is_background() {
        let background = Color::new(0.5, 0.25, 0.75);
        let empty = HittableList::new();
        let world = Counting {
            world: &empty,
            queries: AtomicUsize::new(0),
        };
        let config = RenderConfig {
            image_width: 8,
            image_height: 4,
            samples_per_pixel: 4,
            background: Background::Color(background),
            ..RenderConfig::default()
        };

        let image = render(&pinhole(), &world, &config);
        assert!(image.pixels.iter().all(|&c| c == background));

        // One query per camera ray, none recursive
        assert_eq!(world.queries.load(Ordering::Relaxed), 8 * 4 * 4);
    }

    #[test]
    fn test_parallel_mirrors_exhaust_depth() {
        let mirror = Arc::new(Metal::new(Color::splat(0.8), 0.0));
        let mut world = HittableList::new();
        world.add(Arc::new(AaRect::xz((-1.0, 1.0), (-1.0, 1.0), 0.0, mirror.clone())));
        world.add(Arc::new(AaRect::xz((-1.0, 1.0), (-1.0, 1.0), 1.0, mirror)));

        // Crosses the gap ten times before walking off the +x edge
        let ray = Ray::new_simple(Vec3::new(-0.95, 0.5, 0.0), Vec3::new(0.2, 1.0, 0.0));
        let background = Background::Color(Color::ONE);
        let mut rng = StdRng::seed_from_u64(3);
        let mut trace = |depth| ray_color(&ray, &world, depth, &background, &mut rng);

        assert_eq!(trace(0), Color::ZERO);
        assert_eq!(trace(5), Color::ZERO);
        assert_eq!(trace(10), Color::ZERO);

        let expected = 0.8_f32.powi(10);
        for depth in [11, 50] {
            let color = trace(depth);
            assert!((color.x - expected).abs() < 1e-5, "depth {} gave {:?}", depth, color);
            assert_eq!(color.x, color.y);
            assert_eq!(color.y, color.z);
        }
    }

    #[test]
    fn test_render_is_independent_of_thread_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let objects: Vec<Arc<dyn Hittable>> = (0..20)
            .map(|i| {
                let center = Vec3::new(i as f32 * 0.3 - 3.0, 0.0, -3.0 - (i % 4) as f32);
                let albedo = lumen_math::sampling::random_vec3(&mut rng, 0.2, 0.9);
                Arc::new(Sphere::new(center, 0.4, Arc::new(Lambertian::new(albedo))))
                    as Arc<dyn Hittable>
            })
            .collect();
        let world = BvhNode::new(objects, 0.0, 1.0).unwrap();
        let config = RenderConfig {
            image_width: 24,
            image_height: 16,
            samples_per_pixel: 4,
            max_depth: 8,
            seed: 99,
            bucket_size: 5,
            ..RenderConfig::default()
        };
        let camera = Camera::builder().with_aspect_ratio(1.5).build();

        let render_with = |threads| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| render(&camera, &world, &config))
        };

        assert_eq!(render_with(1), render_with(4));
    }

    #[test]
    fn test_image_rows_are_top_first() {
        // The sky is bluer straight up, so the top row has less red
        let world = HittableList::new();
        let config = RenderConfig {
            image_width: 1,
            image_height: 3,
            samples_per_pixel: 8,
            ..RenderConfig::default()
        };

        let image = render(&pinhole(), &world, &config);
        assert!(image.get(0, 0).x < image.get(0, 1).x);
        assert!(image.get(0, 1).x < image.get(0, 2).x);
        assert_eq!(image.to_rgb8().len(), 3);
    }
}
