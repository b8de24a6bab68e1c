//! Instancing decorators that move a shared object without copying it.
//!
//! Rays are carried into the object's local space, intersected there, and
//! the hit is carried back out. The wrapped object's material is reported
//! unchanged.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use lumen_math::{Aabb, Interval, Mat4, Mat4Ext, Vec3};

/// An object displaced by a constant offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        Self { object, offset }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        // Direction is unchanged, so normal and front_face carry over as-is
        let mut rec = self.object.hit(&moved, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// An object rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    /// Local-to-world
    transform: Mat4,
    /// World-to-local
    inv_transform: Mat4,
    bbox: Option<Aabb>,
}

impl RotateY {
    /// Rotate `object` by `angle` degrees, counter-clockwise looking down -Y.
    ///
    /// The rotated box is computed once from the object's box over the
    /// unit shutter interval.
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let transform = Mat4::from_rotation_y(angle.to_radians());
        let inv_transform = transform.inverse();
        let bbox = object
            .bounding_box(0.0, 1.0)
            .map(|local| transform.transform_aabb(&local));

        Self {
            object,
            transform,
            inv_transform,
            bbox,
        }
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Direction is not renormalized so t stays valid in both spaces
        let local_ray = Ray::new(
            self.inv_transform.transform_point3(ray.origin()),
            self.inv_transform.transform_vector3(ray.direction()),
            ray.time(),
        );

        let mut rec = self.object.hit(&local_ray, ray_t)?;
        rec.p = self.transform.transform_point3(rec.p);
        // Rotation preserves the dot product, so front_face carries over
        rec.normal = self.transform.transform_vector3(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        self.bbox
    }
}
