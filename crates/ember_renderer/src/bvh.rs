//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree of bounding boxes built with a median split along the
//! longest axis of each node's box. The tree is itself a [`Hittable`], so
//! it can be nested or wrapped anywhere a primitive can.

use crate::{HitRecord, Hittable, HittableList};
use ember_math::{Aabb, Interval, Ray};
use std::cmp::Ordering;
use std::sync::Arc;

/// BVH node.
///
/// Children are shared handles: leaves point at the same primitives as the
/// list the tree was built from, and interior children are nested nodes.
pub enum BvhNode {
    /// Node with two children. For a single primitive both children are
    /// the same object.
    Branch {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Empty node (no primitives).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let count = objects.len();
        let (node, depth) = Self::build(&mut objects);
        log::debug!("Built BVH over {} primitives (depth {})", count, depth);
        node
    }

    /// Build a BVH over the members of a list.
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive construction over a non-empty span. Returns the node and
    /// the depth of the subtree rooted at it.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> (Self, usize) {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, object| {
                Aabb::surrounding(&acc, &object.bounding_box())
            });
        let axis = bbox.longest_axis();

        let (left, right, depth) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone(), 1),
            2 => (objects[0].clone(), objects[1].clone(), 1),
            _ => {
                objects.sort_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

                let mid = objects.len() / 2;
                let (lower, upper) = objects.split_at_mut(mid);
                let (left, left_depth) = Self::build(lower);
                let (right, right_depth) = Self::build(upper);

                (
                    Arc::new(left) as Arc<dyn Hittable>,
                    Arc::new(right) as Arc<dyn Hittable>,
                    1 + left_depth.max(right_depth),
                )
            }
        };

        (BvhNode::Branch { left, right, bbox }, depth)
    }
}

/// Order two objects by the minimum of their boxes along `axis`.
fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Material, Sphere};
    use ember_math::{Color, Vec3};

    fn sphere_at(center: Vec3) -> Arc<dyn Hittable> {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        Arc::new(Sphere::new(center, 0.5, material))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert!(bvh.bounding_box().is_empty());

        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_bvh_single_sphere() {
        let bvh = BvhNode::new(vec![sphere_at(Vec3::new(0.0, 0.0, -1.0))]);

        // One primitive: both children alias it
        match &bvh {
            BvhNode::Branch { left, right, .. } => assert!(Arc::ptr_eq(left, right)),
            BvhNode::Empty => panic!("expected a branch"),
        }

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_two_spheres_split() {
        let a = sphere_at(Vec3::new(-2.0, 0.0, -5.0));
        let b = sphere_at(Vec3::new(2.0, 0.0, -5.0));
        let bvh = BvhNode::new(vec![a.clone(), b.clone()]);

        match &bvh {
            BvhNode::Branch { left, right, .. } => {
                assert!(Arc::ptr_eq(left, &a));
                assert!(Arc::ptr_eq(right, &b));
            }
            BvhNode::Empty => panic!("expected a branch"),
        }
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..10)
            .map(|i| sphere_at(Vec3::new(i as f32, 0.0, -5.0)))
            .collect();

        let bvh = BvhNode::new(spheres);

        // Test ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_picks_nearest_along_ray() {
        // Spheres lined up along the ray: the closest must win regardless
        // of which subtree holds it
        let spheres: Vec<Arc<dyn Hittable>> = (1..=9)
            .rev()
            .map(|i| sphere_at(Vec3::new(0.0, 0.0, -2.0 * i as f32)))
            .collect();
        let bvh = BvhNode::new(spheres);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_bbox_encloses_members() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..7)
            .map(|i| sphere_at(Vec3::new(i as f32, -(i as f32), 2.0 * i as f32)))
            .collect();
        let bvh = BvhNode::new(spheres.clone());

        for sphere in &spheres {
            assert!(bvh.bounding_box().encloses(&sphere.bounding_box()));
        }
    }
}
