//! Ember core - surface textures for the path tracer.
//!
//! This crate provides:
//!
//! - **Texture contract**: `Texture::value(u, v, p)` sampled by materials
//! - **Textures**: solid color, 3-D checker, Perlin marble, bitmap image
//! - **Perlin noise**: gradient noise with turbulence
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{ImageTexture, Texture};
//!
//! let earth = ImageTexture::load("earthmap.jpg")?;
//! let color = earth.value(0.5, 0.5, Vec3::ZERO);
//! ```

pub mod perlin;
pub mod texture;

pub use perlin::Perlin;
pub use texture::{
    CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture, TextureError, TextureResult,
};
