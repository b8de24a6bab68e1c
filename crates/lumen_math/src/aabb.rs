use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Boxes are never padded implicitly; primitives with no thickness along an
/// axis pad themselves with [`Aabb::padded`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        }
    }

    /// Per-axis elementwise min/max of two boxes.
    pub fn union(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::union(&box0.x, &box1.x),
            y: Interval::union(&box0.y, &box1.y),
            z: Interval::union(&box0.z, &box1.z),
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray overlaps this AABB anywhere in the half-open `ray_t`.
    ///
    /// Slab method: the interval is narrowed axis by axis and the test
    /// fails as soon as it becomes empty. An axis the ray does not move
    /// along is handled without dividing by zero: it overlaps for every `t`
    /// when the origin lies inside that slab, and never otherwise.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = r.origin[axis];
            let dir = r.direction[axis];

            if dir == 0.0 {
                if !slab.contains(origin) {
                    return false;
                }
                continue;
            }

            let inv_d = 1.0 / dir;
            let mut t0 = (slab.min - origin) * inv_d;
            let mut t1 = (slab.max - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Copy of this box with every axis thinner than `delta` widened to it.
    pub fn padded(&self, delta: f32) -> Aabb {
        let pad = |i: Interval| if i.size() < delta { i.expand(delta) } else { i };
        Aabb::new(pad(self.x), pad(self.y), pad(self.z))
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.offset(offset.x),
            self.y.offset(offset.y),
            self.z.offset(offset.z),
        )
    }

    /// Box containing nothing; the identity for [`Aabb::union`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
