//! Raster compositing for tilestitch, built on the [`image`] crate.
//!
//! [`ImageCompositor`] implements [`tilestitch_core::Compositor`]: it decodes PNG, JPEG and WebP
//! tiles, draws them onto one RGBA canvas and encodes the canvas once into the requested format.

mod compositor;
pub use compositor::*;

pub mod format;
