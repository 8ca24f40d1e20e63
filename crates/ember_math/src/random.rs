//! Seeded random sampling for the path tracer.
//!
//! One generator per thread, seeded with [`DEFAULT_SEED`] until [`seed`] is
//! called. A single-threaded render is therefore reproducible: same seed,
//! same scene, same pixels.

use crate::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::f32::consts::PI;

pub const DEFAULT_SEED: u64 = 0;

thread_local! {
    static RNG: RefCell<StdRng> = RefCell::new(StdRng::seed_from_u64(DEFAULT_SEED));
}

/// Reset this thread's generator to a known state.
pub fn seed(seed: u64) {
    RNG.with(|rng| *rng.borrow_mut() = StdRng::seed_from_u64(seed));
}

/// Run `f` with exclusive access to this thread's generator.
pub fn with_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Random f32 in [0, 1).
pub fn random_f32() -> f32 {
    with_rng(|rng| rng.gen::<f32>())
}

/// Random f32 in [min, max).
pub fn random_range(min: f32, max: f32) -> f32 {
    min + (max - min) * random_f32()
}

/// Random integer in [min, max] (inclusive).
pub fn random_int(min: i32, max: i32) -> i32 {
    with_rng(|rng| rng.gen_range(min..=max))
}

/// Vector with each component in [min, max).
pub fn random_vec3(min: f32, max: f32) -> Vec3 {
    Vec3::new(
        random_range(min, max),
        random_range(min, max),
        random_range(min, max),
    )
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector() -> Vec3 {
    // Rejection sampling keeps the distribution uniform on the sphere
    loop {
        let v = random_vec3(-1.0, 1.0);
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Uniform point in the unit disk of the XY plane (z = 0).
pub fn random_in_unit_disk() -> Vec3 {
    loop {
        let p = Vec3::new(random_range(-1.0, 1.0), random_range(-1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted direction on the +Z hemisphere. Density is `z / PI`.
pub fn random_cosine_direction() -> Vec3 {
    let r1 = random_f32();
    let r2 = random_f32();

    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    let z = (1.0 - r2).sqrt();

    Vec3::new(x, y, z)
}

/// Direction (around +Z) uniformly inside the cone subtended by a sphere of
/// `radius` whose center lies `sqrt(distance_squared)` away along +Z.
pub fn random_to_sphere(radius: f32, distance_squared: f32) -> Vec3 {
    let r1 = random_f32();
    let r2 = random_f32();
    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);

    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_reproducible() {
        seed(7);
        let first: Vec<f32> = (0..8).map(|_| random_f32()).collect();
        seed(7);
        let second: Vec<f32> = (0..8).map(|_| random_f32()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_range_bounds() {
        seed(1);
        for _ in 0..1000 {
            let x = random_range(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&x));
        }
        for _ in 0..1000 {
            let i = random_int(0, 3);
            assert!((0..=3).contains(&i));
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        seed(2);
        for _ in 0..1000 {
            assert!((random_unit_vector().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_random_in_unit_disk() {
        seed(3);
        for _ in 0..1000 {
            let p = random_in_unit_disk();
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_cosine_direction_upper_hemisphere() {
        seed(4);
        for _ in 0..1000 {
            let d = random_cosine_direction();
            assert!(d.z >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_random_to_sphere_stays_in_cone() {
        seed(5);
        let (radius, distance) = (1.0_f32, 4.0_f32);
        let cos_theta_max = (1.0 - radius * radius / (distance * distance)).sqrt();
        for _ in 0..1000 {
            let d = random_to_sphere(radius, distance * distance);
            assert!(d.z >= cos_theta_max - 1e-5);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }
}
