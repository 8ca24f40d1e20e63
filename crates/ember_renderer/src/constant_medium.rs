//! Constant-density participating media (fog, smoke).

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use ember_core::Texture;
use ember_math::random::random_f32;
use ember_math::{Aabb, Color, Interval, Ray, Vec3};
use std::sync::Arc;

/// Offset used to find the exit point after the entry point.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of uniform density filling a boundary shape.
///
/// The boundary must be convex: a ray is assumed to enter it at most once
/// and leave it at most once. Concave boundaries are not supported.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, texture: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::from_texture(texture),
        }
    }

    pub fn with_color(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        // Entry and exit along the whole line, then clip to the query range
        let entry = self.boundary.hit(ray, Interval::UNIVERSE)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY))?;

        let t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        let t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * random_f32().ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary: the phase function ignores orientation
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{make_box, Lambertian, Material, Sphere};
    use ember_math::random;

    fn unit_sphere() -> Arc<dyn Hittable> {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        Arc::new(Sphere::new(Vec3::ZERO, 1.0, material))
    }

    #[test]
    fn test_dense_medium_scatters_inside() {
        random::seed(61);
        let fog = ConstantMedium::with_color(unit_sphere(), 1.0e6, Color::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        for _ in 0..100 {
            let rec = fog.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
            // Very dense: scatters just past the entry point
            assert!(rec.t >= 4.0 && rec.t < 4.01);
            assert!(rec.front_face);
            assert_eq!(rec.normal, Vec3::X);
        }
    }

    #[test]
    fn test_thin_medium_mostly_transparent() {
        random::seed(62);
        let fog = ConstantMedium::with_color(unit_sphere(), 1.0e-6, Color::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let hits = (0..1000)
            .filter(|_| fog.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_some())
            .count();
        assert!(hits < 5);
    }

    #[test]
    fn test_ray_starting_inside() {
        random::seed(63);
        let fog = ConstantMedium::with_color(unit_sphere(), 1.0e6, Color::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        let rec = fog.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!(rec.t >= 0.001 && rec.t < 0.01);
    }

    #[test]
    fn test_miss_and_bbox() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        let boundary: Arc<dyn Hittable> = Arc::new(make_box(Vec3::ZERO, Vec3::ONE, material));
        let smoke = ConstantMedium::with_color(boundary.clone(), 0.5, Color::ZERO);

        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::X, 0.0);
        assert!(smoke.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
        assert_eq!(smoke.bounding_box(), boundary.bounding_box());
    }

    #[test]
    fn test_medium_behind_query_range() {
        let fog = ConstantMedium::with_color(unit_sphere(), 1.0e6, Color::ONE);
        // Sphere lies entirely behind the ray origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, 0.0);
        assert!(fog.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }
}
