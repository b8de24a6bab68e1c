//! Axis-aligned rectangles and boxes built from them.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};

/// Half-thickness given to rectangles along their constant axis so that
/// their bounding boxes are never degenerate.
const RECT_PAD: f32 = 0.0001;

/// Orientation of an [`AaRect`], named by the two axes it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Spans x and y, constant z.
    Xy,
    /// Spans x and z, constant y.
    Xz,
    /// Spans y and z, constant x.
    Yz,
}

impl Plane {
    /// `(a, b, k)` axis indices: the two spanned axes and the constant one.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }
}

/// A rectangle `a0..a1 x b0..b1` in the plane `k` along the omitted axis.
pub struct AaRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    material: Arc<dyn Material>,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            plane,
            a: Interval::new(a0.min(a1), a0.max(a1)),
            b: Interval::new(b0.min(b1), b0.max(b1)),
            k,
            material,
        }
    }

    pub fn xy(x: (f32, f32), y: (f32, f32), z: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Xy, x, y, z, material)
    }

    pub fn xz(x: (f32, f32), z: (f32, f32), y: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Xz, x, z, y, material)
    }

    pub fn yz(y: (f32, f32), z: (f32, f32), x: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Yz, y, z, x, material)
    }

}

impl Hittable for AaRect {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (ai, bi, ki) = self.plane.axes();
        let origin = ray.origin();
        let dir = ray.direction();

        // Parallel rays never cross the plane, and zero-area rects have no UVs
        if dir[ki] == 0.0 || self.a.size() <= 0.0 || self.b.size() <= 0.0 {
            return None;
        }

        let t = (self.k - origin[ki]) / dir[ki];
        if !ray_t.admits(t) {
            return None;
        }

        let a = origin[ai] + t * dir[ai];
        let b = origin[bi] + t * dir[bi];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let mut outward_normal = Vec3::ZERO;
        outward_normal[ki] = 1.0;

        let uv = (
            (a - self.a.min) / self.a.size(),
            (b - self.b.min) / self.b.size(),
        );
        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            uv,
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let (ai, bi, ki) = self.plane.axes();
        let mut lo = Vec3::ZERO;
        let mut hi = Vec3::ZERO;
        lo[ai] = self.a.min;
        hi[ai] = self.a.max;
        lo[bi] = self.b.min;
        hi[bi] = self.b.max;
        lo[ki] = self.k - RECT_PAD;
        hi[ki] = self.k + RECT_PAD;
        Some(Aabb::from_points(lo, hi))
    }
}

/// An axis-aligned box made of six rectangles.
pub struct AaBox {
    box_min: Vec3,
    box_max: Vec3,
    sides: HittableList,
}

impl AaBox {
    /// Box spanning the corners `p0` and `p1`, all faces sharing `material`.
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        let box_min = p0.min(p1);
        let box_max = p0.max(p1);
        let (lo, hi) = (box_min, box_max);

        let mut sides = HittableList::new();
        for z in [hi.z, lo.z] {
            sides.add(Arc::new(AaRect::xy((lo.x, hi.x), (lo.y, hi.y), z, material.clone())));
        }
        for y in [hi.y, lo.y] {
            sides.add(Arc::new(AaRect::xz((lo.x, hi.x), (lo.z, hi.z), y, material.clone())));
        }
        for x in [hi.x, lo.x] {
            sides.add(Arc::new(AaRect::yz((lo.y, hi.y), (lo.z, hi.z), x, material.clone())));
        }

        Self {
            box_min,
            box_max,
            sides,
        }
    }
}

impl Hittable for AaBox {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.sides.hit(ray, ray_t)
    }

    /// The box's own corners, not the union of its padded faces.
    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::from_points(self.box_min, self.box_max))
    }
}
