//! Ember math - geometry kernel for the path tracer.
//!
//! Vectors come straight from glam; everything ray-tracing specific
//! (intervals, bounding boxes, rays, orthonormal bases and the seeded
//! sampling routines) lives here.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;
pub mod random;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;

/// Linear RGB color. Components are usually in [0, 1] but emitters go higher.
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_normalize_divides_by_length() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        let n = v.normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert_eq!(n, v / 5.0);
    }
}
