//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with configurable depth
//! - Light importance sampling mixed 50/50 with material sampling
//! - Anti-aliasing via multi-sampling
//! - Gamma correction for 8-bit output

use crate::{Camera, HitRecord, Hittable, HittablePdf, MixturePdf, Pdf, ScatterKind};
use ember_math::{Color, Interval, Ray};
use std::time::Instant;

/// Lower bound on hit distance for secondary rays (avoids self-intersection).
const T_MIN: f32 = 0.001;

/// Rows between progress messages.
const PROGRESS_INTERVAL: u32 = 16;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Constant color (black for light-only scenes).
    Solid(Color),
    /// White-to-blue vertical gradient.
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => sky_gradient(ray),
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Radiance for rays that leave the scene
    pub background: Background,
}

impl RenderConfig {
    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::Solid(Color::ZERO),
        }
    }
}

/// Compute the radiance carried back along a ray.
///
/// `lights` lists the shapes worth sampling directly. With `None` (or a
/// set with nothing in it) diffuse bounces sample the material alone.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    depth: u32,
    config: &RenderConfig,
) -> Color {
    // Bounce budget exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY)) else {
        return config.background.color(ray);
    };

    let emitted = rec.material.emitted(ray, &rec, rec.u, rec.v, rec.p);

    let Some(scatter) = rec.material.scatter(ray, &rec) else {
        return emitted;
    };

    let material_pdf = match scatter.kind {
        ScatterKind::Specular(scattered) => {
            return emitted
                + scatter.attenuation * ray_color(&scattered, world, lights, depth - 1, config);
        }
        ScatterKind::Pdf(pdf) => pdf,
    };

    let lights = lights.filter(|lights| !lights.bounding_box().is_empty());
    let (scattered, pdf_value) = match lights {
        Some(lights) => {
            let light_pdf = HittablePdf::new(lights, rec.p);
            let mixture = MixturePdf::new(&light_pdf, material_pdf.as_ref());
            sample_direction(&mixture, ray, &rec)
        }
        None => sample_direction(material_pdf.as_ref(), ray, &rec),
    };

    // A direction the sampler can't produce carries no estimate
    if pdf_value <= 0.0 {
        return emitted;
    }

    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
    let sample_color = ray_color(&scattered, world, lights, depth - 1, config);

    emitted + scatter.attenuation * scattering_pdf * sample_color / pdf_value
}

/// Draw a continuation ray from `pdf` and return it with its density.
fn sample_direction(pdf: &dyn Pdf, ray_in: &Ray, rec: &HitRecord) -> (Ray, f32) {
    let scattered = Ray::new(rec.p, pdf.generate(), ray_in.time());
    let density = pdf.value(scattered.direction());
    (scattered, density)
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit sRGB-ish bytes.
///
/// NaN components become 0; values are gamma corrected and clamped to
/// [0, 0.999] before scaling.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f32| {
        let c = if c.is_nan() { 0.0 } else { c };
        (256.0 * intensity.clamp(linear_to_gamma(c))) as u8
    };
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y);
        pixel_color += ray_color(&ray, world, lights, config.max_depth, config);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Linear colors, row-major from the top-left
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to packed RGB bytes (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgb8(*color))
            .collect()
    }
}

/// Render the entire scene to an image buffer, one pixel at a time.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    config: &RenderConfig,
) -> ImageBuffer {
    let start = Instant::now();
    log::info!(
        "Rendering {}x{} at {} spp, max depth {}",
        camera.image_width,
        camera.image_height,
        config.samples_per_pixel,
        config.max_depth
    );

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        if y % PROGRESS_INTERVAL == 0 {
            log::debug!("Scanlines remaining: {}", camera.image_height - y);
        }
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, lights, x, y, config);
            image.set(x, y, color);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
