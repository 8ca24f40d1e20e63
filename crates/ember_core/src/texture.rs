//! Surface textures sampled by materials.
//!
//! Every texture answers `value(u, v, p)`: surface coordinates plus the
//! world-space hit point. Solid and procedural textures ignore whichever of
//! the two they don't need.

use std::path::Path;
use std::sync::Arc;

use ember_math::{Color, Interval, Vec3};
use thiserror::Error;

use crate::perlin::Perlin;

/// Errors that can occur while loading a bitmap texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has no pixels: {0}")]
    EmptyImage(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Color lookup at a surface point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Constant color everywhere.
#[derive(Clone, Copy, Debug)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// Solid 3-D checkerboard alternating between two textures.
///
/// Cells are cubes of side `scale` in world space, so the pattern does not
/// depend on the surface parameterization.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i32 + cell.y as i32 + cell.z as i32;

        if sum % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Grey marble: sine stripes along z perturbed by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    const TURBULENCE_DEPTH: u32 = 7;

    pub fn new(scale: f32) -> Self {
        Self {
            noise: Perlin::new(),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let turbulence = self.noise.turbulence(p, Self::TURBULENCE_DEPTH);
        Color::splat(0.5) * (1.0 + (self.scale * p.z + 10.0 * turbulence).sin())
    }
}

/// Bitmap texture with nearest-neighbour lookup.
///
/// Pixels are stored as linear RGB. A texture without data returns solid
/// cyan so missing images are obvious in the render.
#[derive(Clone, Debug, Default)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Debug color for a texture with no pixel data.
    pub const MISSING: Color = Color::new(0.0, 1.0, 1.0);

    /// Load an image from disk (any format the `image` crate decodes).
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let rgb = image::load_from_memory(&bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage(path.display().to_string()));
        }

        let pixels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a texture from row-major linear pixels (top row first).
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> TextureResult<Self> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return Err(TextureError::EmptyImage(format!(
                "<memory {}x{}, {} pixels>",
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(Self::MISSING)
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.is_empty() {
            return Self::MISSING;
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v); // Flip V to image rows

        let i = (u * self.width as f32) as u32;
        let j = (v * self.height as f32) as u32;
        self.pixel(i, j)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
