//! Sphere primitives for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};

/// A static sphere.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero, and a
    /// zero-radius sphere is never hit.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(sphere_box(self.center, self.radius))
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`, sampled at each ray's own time.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    pub fn new(
        (center0, time0): (Vec3, f32),
        (center1, time1): (Vec3, f32),
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at `time`, extrapolated outside the keyframe interval.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(
            self.center(ray.time()),
            self.radius,
            self.material.as_ref(),
            ray,
            ray_t,
        )
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let box0 = sphere_box(self.center(time0), self.radius);
        let box1 = sphere_box(self.center(time1), self.radius);
        Some(Aabb::union(&box0, &box1))
    }
}

fn sphere_box(center: Vec3, radius: f32) -> Aabb {
    let rvec = Vec3::splat(radius);
    Aabb::from_points(center - rvec, center + rvec)
}

/// Ray-sphere intersection with the half-b form of the quadratic.
///
/// Takes the nearer root if it lies in `ray_t`, otherwise the farther one.
fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    // No surface to take a normal from
    if radius <= 0.0 {
        return None;
    }

    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.admits(root) {
        root = (h + sqrtd) / a;
        if !ray_t.admits(root) {
            return None;
        }
    }

    let outward_normal = (ray.at(root) - center) / radius;
    Some(HitRecord::new(
        ray,
        root,
        outward_normal,
        get_sphere_uv(outward_normal),
        material,
    ))
}

/// UV coordinates for a point on the unit sphere centered at the origin.
///
/// `u` is the angle around Y from -X, `v` the angle up from -Y, both
/// scaled to [0, 1].
fn get_sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use lumen_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, Interval::from(0.001)).unwrap();
        assert!((rec.t - 0.5).abs() < 0.001);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        assert!(sphere.hit(&ray, Interval::from(0.001)).is_none());
    }

    #[test]
    fn test_degenerate_sphere_is_never_hit() {
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        for radius in [0.0, -1.0] {
            let sphere = Sphere::new(Vec3::new(0.0, 0.0, -2.0), radius, gray());
            assert!(sphere.hit(&ray, Interval::from(0.001)).is_none());

            let moving = MovingSphere::new(
                (Vec3::new(0.0, 0.0, -2.0), 0.0),
                (Vec3::new(0.0, 0.0, -2.0), 1.0),
                radius,
                gray(),
            );
            assert!(moving.hit(&ray, Interval::from(0.001)).is_none());
        }
    }

    #[test]
    fn test_sphere_far_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, Interval::from(0.001)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_X);
    }

    #[test]
    fn test_sphere_respects_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        assert!(sphere.hit(&ray, Interval::new(0.001, 3.9)).is_none());
        let rec = sphere.hit(&ray, Interval::new(4.5, 100.0)).unwrap();
        assert!((rec.t - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_normal_is_unit_and_faces_ray() {
        let mut rng = StdRng::seed_from_u64(17);
        let sphere = Sphere::new(Vec3::new(0.5, -0.25, -3.0), 1.3, gray());

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = lumen_math::sampling::random_vec3(&mut rng, -4.0, 4.0);
            let dir = lumen_math::sampling::random_unit_vector(&mut rng);
            let ray = Ray::new_simple(origin, dir);

            if let Some(rec) = sphere.hit(&ray, Interval::from(0.001)) {
                hits += 1;
                assert!((rec.normal.length() - 1.0).abs() < 1e-4);
                assert!(rec.normal.dot(ray.direction()) <= 0.0);

                let outward = (rec.p - Vec3::new(0.5, -0.25, -3.0)) / 1.3;
                assert_eq!(ray.direction().dot(outward) < 0.0, rec.front_face);
            }
        }
        assert!(hits > 20);
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = get_sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5 && (v - 0.5).abs() < 1e-5);

        let (_, v) = get_sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);

        let (u, v) = get_sphere_uv(Vec3::NEG_Z);
        assert!((u - 0.75).abs() < 1e-5 && (v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_bounding_box() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5, gray());
        let bbox = sphere.bounding_box(0.0, 1.0).unwrap();

        assert_eq!(bbox.min(), Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max(), Vec3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_moving_sphere_follows_ray_time() {
        let sphere = MovingSphere::new(
            (Vec3::new(0.0, 0.0, -5.0), 0.0),
            (Vec3::new(2.0, 0.0, -5.0), 1.0),
            0.5,
            gray(),
        );
        assert_eq!(sphere.center(0.5), Vec3::new(1.0, 0.0, -5.0));

        let early = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);
        let late = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 1.0);
        assert!(sphere.hit(&early, Interval::from(0.001)).is_some());
        assert!(sphere.hit(&late, Interval::from(0.001)).is_none());

        let shifted = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_Z, 1.0);
        let rec = sphere.hit(&shifted, Interval::from(0.001)).unwrap();
        assert!((rec.t - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_box_covers_both_keyframes() {
        let sphere = MovingSphere::new(
            (Vec3::ZERO, 0.0),
            (Vec3::new(0.0, 4.0, 0.0), 1.0),
            1.0,
            gray(),
        );
        let bbox = sphere.bounding_box(0.0, 1.0).unwrap();

        assert_eq!(bbox.min(), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(1.0, 5.0, 1.0));
    }
}
