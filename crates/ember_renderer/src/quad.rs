//! Planar primitives: quads, triangles, ellipses and annuli.
//!
//! Every shape lives in the plane spanned by an origin `q` and two edge
//! vectors `u`, `v`. A hit point `p` is expressed in planar coordinates
//! `(alpha, beta)` such that `p = q + alpha * u + beta * v`; each shape is
//! then just a different membership test on those coordinates.

use crate::{
    hittable::{HitRecord, Hittable},
    HittableList, Material,
};
use ember_math::random::{random_f32, random_in_unit_disk};
use ember_math::{Aabb, Interval, Ray, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;

/// Rays closer to parallel than this never hit the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Interior test applied to planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanarShape {
    /// Parallelogram with corner `q`: `alpha, beta` in [0, 1].
    Quad,
    /// Triangle `q, q+u, q+v`: `alpha > 0, beta > 0, alpha + beta < 1`.
    Triangle,
    /// Ellipse centred on `q` with semi-axes `u`, `v`.
    Ellipse,
    /// Ring centred on `q`; `inner` is the hole radius as a fraction of the
    /// outer one.
    Annulus { inner: f32 },
}

/// A bounded planar shape.
pub struct Planar {
    shape: PlanarShape,
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// n / (n . n), recovers planar coordinates from a hit point
    w: Vec3,
    normal: Vec3,
    d: f32,
    area: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Planar {
    pub fn new(shape: PlanarShape, q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        let parallelogram = n.length();
        let area = match shape {
            PlanarShape::Quad => parallelogram,
            PlanarShape::Triangle => 0.5 * parallelogram,
            PlanarShape::Ellipse => PI * parallelogram,
            PlanarShape::Annulus { inner } => PI * parallelogram * (1.0 - inner * inner),
        };

        let bbox = match shape {
            PlanarShape::Quad | PlanarShape::Triangle => Aabb::surrounding(
                &Aabb::from_points(q, q + u + v),
                &Aabb::from_points(q + u, q + v),
            ),
            PlanarShape::Ellipse | PlanarShape::Annulus { .. } => Aabb::surrounding(
                &Aabb::from_points(q - u - v, q + u + v),
                &Aabb::from_points(q + u - v, q - u + v),
            ),
        };

        Self {
            shape,
            q,
            u,
            v,
            w,
            normal,
            d,
            area,
            material,
            bbox,
        }
    }

    /// Parallelogram with corner `q` and edges `u`, `v`.
    pub fn quad(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(PlanarShape::Quad, q, u, v, material)
    }

    /// Triangle with vertices `q`, `q + u`, `q + v`.
    pub fn triangle(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(PlanarShape::Triangle, q, u, v, material)
    }

    pub fn ellipse(center: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(PlanarShape::Ellipse, center, u, v, material)
    }

    pub fn annulus(
        center: Vec3,
        u: Vec3,
        v: Vec3,
        inner: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        let inner = inner.clamp(0.0, 1.0);
        Self::new(PlanarShape::Annulus { inner }, center, u, v, material)
    }

    pub fn shape(&self) -> PlanarShape {
        self.shape
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    /// Texture coordinates for planar coordinates inside the shape.
    fn interior(&self, alpha: f32, beta: f32) -> Option<(f32, f32)> {
        match self.shape {
            PlanarShape::Quad => {
                let unit = Interval::new(0.0, 1.0);
                (unit.contains(alpha) && unit.contains(beta)).then_some((alpha, beta))
            }
            PlanarShape::Triangle => {
                (alpha > 0.0 && beta > 0.0 && alpha + beta < 1.0).then_some((alpha, beta))
            }
            PlanarShape::Ellipse => {
                (alpha * alpha + beta * beta <= 1.0).then_some(centred_uv(alpha, beta))
            }
            PlanarShape::Annulus { inner } => {
                let dist = (alpha * alpha + beta * beta).sqrt();
                (inner <= dist && dist <= 1.0).then_some(centred_uv(alpha, beta))
            }
        }
    }

    /// Uniformly distributed point on the shape.
    fn random_point(&self) -> Vec3 {
        let (alpha, beta) = match self.shape {
            PlanarShape::Quad => (random_f32(), random_f32()),
            PlanarShape::Triangle => {
                let (a, b) = (random_f32(), random_f32());
                // Fold the far half of the parallelogram back onto the triangle
                if a + b > 1.0 {
                    (1.0 - a, 1.0 - b)
                } else {
                    (a, b)
                }
            }
            PlanarShape::Ellipse => {
                let p = random_in_unit_disk();
                (p.x, p.y)
            }
            PlanarShape::Annulus { inner } => {
                let inner_sq = inner * inner;
                let radius = (inner_sq + random_f32() * (1.0 - inner_sq)).sqrt();
                let phi = 2.0 * PI * random_f32();
                (radius * phi.cos(), radius * phi.sin())
            }
        };

        self.q + alpha * self.u + beta * self.v
    }
}

fn centred_uv(alpha: f32, beta: f32) -> (f32, f32) {
    (alpha / 2.0 + 0.5, beta / 2.0 + 0.5)
}

impl Hittable for Planar {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denominator = self.normal.dot(ray.direction());
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denominator;
        if !ray_t.contains(t) {
            return None;
        }

        let planar_hit = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));
        let uv = self.interior(alpha, beta)?;

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            self.material.as_ref(),
            uv,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Area density converted to solid angle: `distance^2 / (|cos| * area)`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let toward = Ray::new(origin, direction, 0.0);
        let Some(rec) = self.hit(&toward, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();

        distance_squared / (cosine * self.area)
    }

    fn random(&self, origin: Vec3) -> Vec3 {
        self.random_point() - origin
    }
}

/// The six quads of the axis-aligned box with opposite corners `a` and `b`.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];
    for (q, u, v) in faces {
        sides.push(Planar::quad(q, u, v, material.clone()));
    }

    sides
}
