//! Example scenes.
//!
//! Each scene owns its BVH root and chooses its own camera, background
//! and recommended sample count.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use lumen_math::sampling::{gen_f32, gen_range_f32, random_vec3};
use lumen_math::Vec3;
use lumen_renderer::{
    AaBox, AaRect, Background, BvhNode, CameraBuilder, CheckerTexture, Color, Dielectric,
    DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian, Material, Metal,
    MovingSphere, NoiseMode, NoiseTexture, RotateY, Sphere, Texture, Translate,
};
use rand::RngCore;

/// Shutter interval every scene is built and rendered over.
const SHUTTER: (f32, f32) = (0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Many small spheres around three large ones, with motion blur
    Random,
    /// Two checkered spheres
    TwoSpheres,
    /// Ground and sphere with marble noise
    TwoPerlinSpheres,
    /// Image-textured globe
    Earth,
    /// Noise spheres lit by an emissive rectangle
    SimpleLight,
    /// Cornell box with two rotated blocks
    CornellBox,
}

/// A scene ready to render.
pub struct Scene {
    pub world: BvhNode,
    pub camera: CameraBuilder,
    pub aspect_ratio: f32,
    pub background: Background,
    pub samples_per_pixel: u32,
}

impl Scene {
    fn new(objects: HittableList, camera: CameraBuilder, background: Color) -> Result<Self> {
        let count = objects.len();
        let world = BvhNode::new(objects.into_objects(), SHUTTER.0, SHUTTER.1)
            .context("failed to build scene BVH")?;
        log::debug!("Scene has {} top-level objects", count);

        Ok(Self {
            world,
            camera: camera.with_shutter(SHUTTER.0, SHUTTER.1),
            aspect_ratio: 16.0 / 9.0,
            background: Background::Color(background),
            samples_per_pixel: 100,
        })
    }

    fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }
}

const SKY: Color = Color::new(0.7, 0.8, 1.0);

/// Build `kind`. `texture` is the image used by the earth scene.
pub fn build(kind: SceneKind, texture: &Path, rng: &mut dyn RngCore) -> Result<Scene> {
    match kind {
        SceneKind::Random => random_scene(rng),
        SceneKind::TwoSpheres => two_spheres(),
        SceneKind::TwoPerlinSpheres => two_perlin_spheres(rng),
        SceneKind::Earth => earth(texture),
        SceneKind::SimpleLight => simple_light(rng),
        SceneKind::CornellBox => cornell_box(),
    }
}

fn outdoor_camera() -> CameraBuilder {
    CameraBuilder::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
}

fn checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

fn random_scene(rng: &mut dyn RngCore) -> Result<Scene> {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(checker())),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse spheres bounce upward during the shutter
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(MovingSphere::new(
                    (center, SHUTTER.0),
                    (center1, SHUTTER.1),
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = outdoor_camera().with_lens(20.0, 0.1, 10.0);
    Scene::new(world, camera, SKY)
}

fn two_spheres() -> Result<Scene> {
    let material: Arc<dyn Material> = Arc::new(Lambertian::from_texture(checker()));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material)));

    Scene::new(world, outdoor_camera(), SKY)
}

fn perlin_spheres(world: &mut HittableList, rng: &mut dyn RngCore) {
    let marble: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(
        NoiseTexture::new(4.0, NoiseMode::Marble, rng),
    )));

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        marble.clone(),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> Result<Scene> {
    let mut world = HittableList::new();
    perlin_spheres(&mut world, rng);

    Scene::new(world, outdoor_camera(), SKY)
}

fn earth(texture: &Path) -> Result<Scene> {
    let surface = Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::open(texture))));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::ZERO, 2.0, surface)));

    Scene::new(world, outdoor_camera(), SKY)
}

fn simple_light(rng: &mut dyn RngCore) -> Result<Scene> {
    let mut world = HittableList::new();
    perlin_spheres(&mut world, rng);

    let light = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    world.add(Arc::new(AaRect::xy((3.0, 5.0), (1.0, 3.0), -2.0, light)));

    let camera = CameraBuilder::new()
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);
    Ok(Scene::new(world, camera, Color::ZERO)?.with_samples(400))
}

fn cornell_box() -> Result<Scene> {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let full = (0.0, 555.0);
    let mut world = HittableList::new();
    world.add(Arc::new(AaRect::yz(full, full, 555.0, green)));
    world.add(Arc::new(AaRect::yz(full, full, 0.0, red)));
    world.add(Arc::new(AaRect::xz((213.0, 343.0), (227.0, 332.0), 554.0, light)));
    world.add(Arc::new(AaRect::xz(full, full, 0.0, white.clone())));
    world.add(Arc::new(AaRect::xz(full, full, 555.0, white.clone())));
    world.add(Arc::new(AaRect::xy(full, full, 555.0, white.clone())));

    let tall: Arc<dyn Hittable> =
        Arc::new(AaBox::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()));
    let tall = Arc::new(RotateY::new(tall, 15.0));
    world.add(Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0))));

    let short: Arc<dyn Hittable> =
        Arc::new(AaBox::new(Vec3::ZERO, Vec3::splat(165.0), white));
    let short = Arc::new(RotateY::new(short, -18.0));
    world.add(Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0))));

    let camera = CameraBuilder::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0);
    Ok(Scene::new(world, camera, Color::ZERO)?
        .with_aspect_ratio(1.0)
        .with_samples(200))
}
