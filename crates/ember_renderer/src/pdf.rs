//! Direction distributions for importance sampling.
//!
//! A [`Pdf`] both draws directions (`generate`) and reports the density of
//! any direction (`value`). The two must agree: `value` integrates to one
//! over the directions `generate` can produce.

use crate::Hittable;
use ember_math::random::{random_cosine_direction, random_f32, random_unit_vector};
use ember_math::{Onb, Vec3};
use std::f32::consts::PI;

pub trait Pdf {
    /// Density of `direction` under this distribution.
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction.
    fn generate(&self) -> Vec3;
}

/// Uniform over the whole sphere of directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3) -> f32 {
        1.0 / (4.0 * PI)
    }

    fn generate(&self) -> Vec3 {
        random_unit_vector()
    }
}

/// Cosine-weighted hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self { uvw: Onb::new(w) }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cosine_theta = direction.normalize().dot(self.uvw.w());
        (cosine_theta / PI).max(0.0)
    }

    fn generate(&self) -> Vec3 {
        self.uvw.transform(random_cosine_direction())
    }
}

/// Samples directions toward a hittable (usually the scene's lights) as
/// seen from `origin`.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { objects, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.objects.pdf_value(self.origin, direction)
    }

    fn generate(&self) -> Vec3 {
        self.objects.random(self.origin)
    }
}

/// Equal-weight mixture of two distributions.
///
/// `generate` draws from one component chosen by a fair coin, while `value`
/// always averages both components. That asymmetry is what makes the
/// mixture density correct for directions produced by either branch.
pub struct MixturePdf<'a> {
    p: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p: [p0, p1] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.p[0].value(direction) + 0.5 * self.p[1].value(direction)
    }

    fn generate(&self) -> Vec3 {
        if random_f32() < 0.5 {
            self.p[0].generate()
        } else {
            self.p[1].generate()
        }
    }
}
