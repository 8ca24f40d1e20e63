//! Ember Renderer - CPU path tracing
//!
//! A Monte Carlo path tracer with light importance sampling. Scenes are
//! trees of [`Hittable`] objects (spheres, planar shapes, media, transforms)
//! accelerated by a [`BvhNode`]; materials hand back either a sampling
//! [`Pdf`] or a fixed specular ray, and [`ray_color`] mixes material and
//! light sampling to estimate radiance.

mod bvh;
mod camera;
mod constant_medium;
mod hittable;
mod material;
mod pdf;
mod quad;
mod renderer;
mod sphere;
mod transform;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use constant_medium::ConstantMedium;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterKind, ScatterResult,
};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf};
pub use quad::{make_box, Planar, PlanarShape};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, Background, ImageBuffer,
    RenderConfig,
};
pub use sphere::Sphere;
pub use transform::{Rotate, Translate};

/// Re-export the math types used throughout the public API
pub use ember_math::{Aabb, Color, Interval, Ray, Vec3};
