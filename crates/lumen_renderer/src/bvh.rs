//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared scene objects, built once by recursive
//! median split and then queried read-only from every render thread.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use lumen_math::{Aabb, Interval};

/// Errors raised while building a [`BvhNode`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BvhError {
    #[error("cannot build a BVH over an empty object list")]
    Empty,

    #[error("object {index} has no bounding box")]
    MissingBoundingBox { index: usize },
}

/// BVH node - either a branch with two children or a leaf with one object.
///
/// Using an enum keeps traversal to a match on the node kind; only the
/// leaf objects are reached through dynamic dispatch.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node referencing a single object.
    Leaf {
        object: Arc<dyn Hittable>,
        bbox: Aabb,
    },
}

impl BvhNode {
    /// Build a BVH over `objects` valid for the shutter interval
    /// `[time0, time1]`.
    ///
    /// Fails if there are no objects or any object cannot report a box;
    /// such a tree could not bound the scene.
    pub fn new(
        objects: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
    ) -> Result<Self, BvhError> {
        if objects.is_empty() {
            return Err(BvhError::Empty);
        }

        let count = objects.len();
        let entries = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| {
                object
                    .bounding_box(time0, time1)
                    .map(|bbox| (object, bbox))
                    .ok_or(BvhError::MissingBoundingBox { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let root = Self::build(entries, 0);
        log::debug!("Built BVH over {} objects, depth {}", count, root.depth());
        Ok(root)
    }

    /// Recursive construction.
    ///
    /// The split axis cycles x, y, z with depth; objects are sorted by the
    /// minimum of their box along it and split in half.
    fn build(mut entries: Vec<(Arc<dyn Hittable>, Aabb)>, depth: usize) -> Self {
        if entries.len() == 1 {
            let (object, bbox) = entries.remove(0);
            return BvhNode::Leaf { object, bbox };
        }

        let axis = depth % 3;
        entries.sort_by(|(_, a), (_, b)| {
            a.axis_interval(axis)
                .min
                .total_cmp(&b.axis_interval(axis).min)
        });

        let mid = entries.len() / 2;
        let right_entries = entries.split_off(mid);

        let left = Self::build(entries, depth + 1);
        let right = Self::build(right_entries, depth + 1);
        let bbox = Aabb::union(&left.bbox(), &right.bbox());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Cached box of this node.
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of levels, counting a lone leaf as one.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            BvhNode::Leaf { object, .. } => object.hit(ray, ray_t),

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to the closest hit
                let right_t = match &hit_left {
                    Some(rec) => ray_t.with_max(rec.t),
                    None => ray_t,
                };
                right.hit(ray, right_t).or(hit_left)
            }
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox())
    }
}
