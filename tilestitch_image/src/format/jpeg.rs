//! JPEG encoding. JPEG has no alpha channel, so transparent canvas areas are flattened onto
//! white before encoding.

use anyhow::{Result, bail};
use image::{DynamicImage, ImageEncoder, Rgb, RgbImage, codecs::jpeg::JpegEncoder};
use tilestitch_core::Blob;
use tilestitch_derive::context;

pub const DEFAULT_QUALITY: u8 = 90;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Blend every pixel of an RGBA image onto `background`.
fn flatten(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
	let rgba = image.to_rgba8();
	let mut flat = RgbImage::new(rgba.width(), rgba.height());
	for (source, target) in rgba.pixels().zip(flat.pixels_mut()) {
		let alpha = u16::from(source[3]);
		let inverse = 255 - alpha;
		for channel in 0..3 {
			let value = u16::from(source[channel]) * alpha + u16::from(background[channel]) * inverse;
			target[channel] = ((value + 127) / 255) as u8;
		}
	}
	flat
}

#[context("encoding {}x{} image as JPEG (q={:?})", image.width(), image.height(), quality)]
pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Blob> {
	let quality = quality.unwrap_or(DEFAULT_QUALITY);
	if quality > 100 {
		bail!("JPEG quality must be <= 100");
	}

	let flat = if image.color().has_alpha() {
		flatten(image, BACKGROUND)
	} else {
		image.to_rgb8()
	};

	let mut buffer: Vec<u8> = Vec::new();
	JpegEncoder::new_with_quality(&mut buffer, quality.max(1)).write_image(
		flat.as_raw(),
		flat.width(),
		flat.height(),
		image::ExtendedColorType::Rgb8,
	)?;

	Ok(Blob::from(buffer))
}
