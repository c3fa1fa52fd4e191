//! Decoding of tile images and encoding of the finished canvas.
//!
//! Tiles are decoded with format sniffing, so a tile source may mix formats. The canvas is
//! encoded by the submodule of the output format.

pub mod jpeg;
pub mod png;
pub mod webp;

use anyhow::{Context, Result, bail};
use image::{DynamicImage, ImageFormat, guess_format, load_from_memory_with_format};
use tilestitch_core::{Blob, OutputFormat};
use tilestitch_derive::context;

/// Detect the raster format of an encoded image.
pub fn sniff_format(blob: &Blob) -> Result<ImageFormat> {
	let format = guess_format(blob.as_slice()).context("unrecognized image data")?;
	match format {
		ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => Ok(format),
		_ => bail!("unsupported tile format {format:?}"),
	}
}

/// Decode a PNG, JPEG or WebP tile.
#[context("decoding tile image of {} bytes", blob.len())]
pub fn decode(blob: &Blob) -> Result<DynamicImage> {
	let format = sniff_format(blob)?;
	Ok(load_from_memory_with_format(blob.as_slice(), format)?)
}

/// Encode `image` as `format`; `quality` is interpreted by each encoder.
pub fn encode(image: &DynamicImage, format: OutputFormat, quality: Option<u8>) -> Result<Blob> {
	match format {
		OutputFormat::Png => png::encode(image, quality),
		OutputFormat::Jpeg => jpeg::encode(image, quality),
		OutputFormat::Webp => webp::encode(image, quality),
		OutputFormat::VectorPbf => bail!("{format} is not a raster format"),
	}
}

/// The raster format an [`OutputFormat`] encodes to, if any.
#[must_use]
pub fn image_format(format: OutputFormat) -> Option<ImageFormat> {
	match format {
		OutputFormat::Png => Some(ImageFormat::Png),
		OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
		OutputFormat::Webp => Some(ImageFormat::WebP),
		OutputFormat::VectorPbf => None,
	}
}
