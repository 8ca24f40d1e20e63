//! Instancing wrappers that move or rotate another hittable.
//!
//! Both wrappers work the same way: bring the incoming ray into the inner
//! object's space, intersect there, and carry the hit point and normal back
//! out to world space.

use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Quat, Ray, Vec3};
use std::sync::Arc;

/// Moves an object by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&offset_ray, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random(&self, origin: Vec3) -> Vec3 {
        self.object.random(origin - self.offset)
    }
}

/// Rotates an object about an axis through the world origin.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    /// Object space to world space
    rotation: Quat,
    /// World space to object space
    inverse: Quat,
    bbox: Aabb,
}

impl Rotate {
    /// Rotate by `degrees` (counter-clockwise looking down `axis`).
    pub fn new(object: Arc<dyn Hittable>, axis: Vec3, degrees: f32) -> Self {
        let rotation = Quat::from_axis_angle(axis.normalize(), degrees.to_radians());
        let inverse = rotation.inverse();

        // Conservative box: extrema of the eight rotated corners
        let (min, max) = object.bounding_box().corners().iter().fold(
            (Vec3::INFINITY, Vec3::NEG_INFINITY),
            |(min, max), &corner| {
                let rotated = rotation * corner;
                (min.min(rotated), max.max(rotated))
            },
        );

        Self {
            object,
            rotation,
            inverse,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// Rotation about the vertical (+Y) axis.
    pub fn y(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Vec3::Y, degrees)
    }
}

impl Hittable for Rotate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let object_ray = Ray::new(
            self.inverse * ray.origin(),
            self.inverse * ray.direction(),
            ray.time(),
        );

        let mut rec = self.object.hit(&object_ray, ray_t)?;
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object
            .pdf_value(self.inverse * origin, self.inverse * direction)
    }

    fn random(&self, origin: Vec3) -> Vec3 {
        self.rotation * self.object.random(self.inverse * origin)
    }
}
