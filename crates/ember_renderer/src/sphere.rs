//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use ember_math::random::{random_to_sphere, random_unit_vector};
use ember_math::{Aabb, Interval, Onb, Ray, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere primitive, optionally moving linearly over the shutter interval.
pub struct Sphere {
    /// Center at time 0 plus its displacement over time 0..1
    center: Ray,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new(center, Vec3::ZERO, 0.0),
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere whose center moves from `center1` (time 0) to
    /// `center2` (time 1).
    pub fn moving(center1: Vec3, center2: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);
        let box2 = Aabb::from_points(center2 - rvec, center2 + rvec);

        Self {
            center: Ray::new(center1, center2 - center1, 0.0),
            radius,
            material,
            bbox: Aabb::surrounding(&box1, &box2),
        }
    }

    /// Center at the given ray time.
    pub fn center_at(&self, time: f32) -> Vec3 {
        self.center.at(time)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    /// One Newton step on |ray(t) - center|^2 - r^2, kept only when it
    /// lands closer to the surface and still inside `ray_t`.
    ///
    /// The quadratic formula loses digits to cancellation when the ray
    /// starts far from a small sphere; the step recovers them.
    fn refine_root(&self, ray: &Ray, center: Vec3, t: f32, ray_t: Interval) -> f32 {
        let r2 = self.radius * self.radius;
        let offset = ray.at(t) - center;
        let residual = offset.length_squared() - r2;
        let slope = 2.0 * ray.direction().dot(offset);
        if residual == 0.0 || slope == 0.0 {
            return t;
        }

        let refined = t - residual / slope;
        if !ray_t.surrounds(refined) {
            return t;
        }
        let refined_residual = (ray.at(refined) - center).length_squared() - r2;
        if refined_residual.abs() < residual.abs() {
            refined
        } else {
            t
        }
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }
        let root = self.refine_root(ray, current_center, root, ray_t);

        let outward_normal = (ray.at(root) - current_center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            self.material.as_ref(),
            Self::get_sphere_uv(outward_normal),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Uniform density over the cone the sphere subtends from `origin`.
    /// Only meaningful for stationary spheres.
    ///
    /// From on or inside the sphere every direction reaches it, so the
    /// density is uniform over the whole sphere of directions, matching
    /// [`Hittable::random`].
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let distance_squared = (self.center.at(0.0) - origin).length_squared();
        if distance_squared <= self.radius * self.radius {
            return 1.0 / (4.0 * PI);
        }

        let toward = Ray::new(origin, direction, 0.0);
        if self.hit(&toward, Interval::new(0.001, f32::INFINITY)).is_none() {
            return 0.0;
        }

        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared)
            .max(0.0)
            .sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn random(&self, origin: Vec3) -> Vec3 {
        let direction = self.center.at(0.0) - origin;
        let distance_squared = direction.length_squared();
        if distance_squared <= self.radius * self.radius {
            return random_unit_vector();
        }
        let uvw = Onb::new(direction);
        uvw.transform(random_to_sphere(self.radius, distance_squared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use ember_math::{random, Color};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray aimed at sphere");

        assert!((rec.t - 0.5).abs() < 0.001);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(!rec.front_face);
        // Normal flipped to face the ray
        assert!((rec.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_roots_outside_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        assert!(sphere.hit(&ray, Interval::new(0.001, 3.0)).is_none());
        let far = sphere.hit(&ray, Interval::new(5.0, 10.0)).unwrap();
        assert!((far.t - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_uv() {
        // +X maps to u = 0.5, equator to v = 0.5
        let (u, v) = Sphere::get_sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        // South pole (-Y) is v = 0, north pole v = 1
        let (_, v) = Sphere::get_sphere_uv(-Vec3::Y);
        assert!(v.abs() < 1e-5);
        let (_, v) = Sphere::get_sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::moving(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.5, grey());
        let ray0 = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let ray1 = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 1.0);

        assert!(sphere.hit(&ray0, Interval::new(0.001, f32::INFINITY)).is_some());
        assert!(sphere.hit(&ray1, Interval::new(0.001, f32::INFINITY)).is_none());

        let bbox = sphere.bounding_box();
        assert!(bbox.y.contains(-0.5) && bbox.y.contains(2.5));
    }

    #[test]
    fn test_sphere_light_sampling_consistent() {
        random::seed(41);
        let sphere = Sphere::new(Vec3::new(0.0, 10.0, 0.0), 1.0, grey());
        let origin = Vec3::ZERO;

        let cos_theta_max = (1.0_f32 - 1.0 / 100.0).sqrt();
        let expected = 1.0 / (2.0 * PI * (1.0 - cos_theta_max));

        for _ in 0..200 {
            let d = sphere.random(origin);
            assert!(sphere
                .hit(&Ray::new(origin, d, 0.0), Interval::new(0.001, f32::INFINITY))
                .is_some());
        }
        let value = sphere.pdf_value(origin, Vec3::Y);
        assert!((value - expected).abs() / expected < 1e-3);
        assert_eq!(sphere.pdf_value(origin, -Vec3::Y), 0.0);
    }

    #[test]
    fn test_sphere_light_sampling_from_inside() {
        random::seed(44);
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 2.0, grey());

        let uniform = 1.0 / (4.0 * PI);
        for origin in [Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.5, 2.0, 3.0)] {
            for _ in 0..200 {
                let d = sphere.random(origin);
                assert!((d.length() - 1.0).abs() < 1e-4);
                assert_eq!(sphere.pdf_value(origin, d), uniform);
                assert_eq!(sphere.pdf_value(origin, -d), uniform);
            }
        }

        // Directions cover the whole sphere, not one hemisphere
        let away = (0..200)
            .map(|_| sphere.random(Vec3::new(2.5, 2.0, 3.0)))
            .filter(|d| d.x > 0.0)
            .count();
        assert!(away > 50, "{away}");
    }

    #[test]
    fn test_small_sphere_normals_from_afar() {
        random::seed(45);
        let center = Vec3::new(3.0, -2.0, 5.0);
        let radius = 0.3;
        let sphere = Sphere::new(center, radius, grey());

        for _ in 0..500 {
            let origin = center + 15.0 * random::random_unit_vector();
            let target = center + 0.5 * radius * random::random_vec3(-1.0, 1.0);
            let ray = Ray::new(origin, target - origin, 0.0);
            let rec = sphere
                .hit(&ray, Interval::new(0.001, f32::INFINITY))
                .expect("ray aimed inside the sphere");

            assert!((rec.normal.length() - 1.0).abs() < 1e-4, "{}", rec.normal.length());
            assert!(((rec.p - center).length() - radius).abs() < 1e-5);
        }
    }
}
