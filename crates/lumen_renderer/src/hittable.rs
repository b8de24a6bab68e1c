//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::{Material, Ray};
use lumen_math::{Aabb, Interval, Vec3};

/// Record of a ray-object intersection.
///
/// Lives only as long as the intersection query that produced it; the
/// material is borrowed from the surface that was hit.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// `front_face` is true iff the ray and the outward normal have a
    /// negative dot product; the stored normal is flipped otherwise.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` in the half-open interval `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Box enclosing the object for every instant in `[time0, time1]`.
    ///
    /// `None` for objects without a finite extent.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb>;
}

/// A list of hittable objects, searched exhaustively.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Take the objects out, e.g. to build a BVH over them.
    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }
}

impl From<Vec<Arc<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Arc<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let interval = match &closest {
                Some(rec) => ray_t.with_max(rec.t),
                None => ray_t,
            };
            if let Some(rec) = object.hit(ray, interval) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let (first, rest) = self.objects.split_first()?;
        rest.iter().try_fold(first.bounding_box(time0, time1)?, |acc, object| {
            Some(Aabb::union(&acc, &object.bounding_box(time0, time1)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use lumen_math::Color;

    fn sphere(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        ))
    }

    /// Object without a finite extent.
    struct Unbounded;

    impl Hittable for Unbounded {
        fn hit(&self, _ray: &Ray, _ray_t: Interval) -> Option<HitRecord<'_>> {
            None
        }

        fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
            None
        }
    }

    #[test]
    fn test_list_returns_nearest_not_first() {
        let mut list = HittableList::new();
        list.add(sphere(Vec3::new(0.0, 0.0, -10.0), 1.0));
        list.add(sphere(Vec3::new(0.0, 0.0, -3.0), 1.0));
        list.add(sphere(Vec3::new(0.0, 0.0, -6.0), 1.0));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        let rec = list.hit(&ray, Interval::from(0.001)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_list_matches_brute_force_minimum() {
        let objects: Vec<Arc<dyn Hittable>> = (0..8)
            .map(|i| sphere(Vec3::new(0.1 * i as f32, 0.0, -2.0 - 1.5 * i as f32), 0.5))
            .rev()
            .collect();
        let list = HittableList::from(objects.clone());

        let ray = Ray::new_simple(Vec3::new(0.3, 0.0, 1.0), Vec3::NEG_Z);
        let ray_t = Interval::new(0.001, 20.0);

        let brute = objects
            .iter()
            .filter_map(|o| o.hit(&ray, ray_t).map(|r| r.t))
            .fold(f32::INFINITY, f32::min);
        let rec = list.hit(&ray, ray_t).unwrap();
        assert_eq!(rec.t, brute);
    }

    #[test]
    fn test_empty_list() {
        let list = HittableList::new();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        assert!(list.hit(&ray, Interval::from(0.001)).is_none());
        assert!(list.bounding_box(0.0, 1.0).is_none());
    }

    #[test]
    fn test_list_bounding_box() {
        let mut list = HittableList::new();
        list.add(sphere(Vec3::new(-2.0, 0.0, 0.0), 1.0));
        list.add(sphere(Vec3::new(3.0, 1.0, 0.0), 0.5));

        let bbox = list.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::new(-3.0, -1.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(3.5, 1.5, 1.0));

        list.add(Arc::new(Unbounded));
        assert!(list.bounding_box(0.0, 1.0).is_none());
    }

    #[test]
    fn test_set_face_normal() {
        let mat = Lambertian::new(Color::ONE);
        let toward = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        let front = HitRecord::new(&toward, 1.0, Vec3::Z, (0.0, 0.0), &mat);
        assert!(front.front_face);
        assert_eq!(front.normal, Vec3::Z);

        let back = HitRecord::new(&toward, 1.0, Vec3::NEG_Z, (0.0, 0.0), &mat);
        assert!(!back.front_face);
        assert_eq!(back.normal, Vec3::Z);
        assert_eq!(back.p, Vec3::new(0.0, 0.0, -1.0));
    }
}
