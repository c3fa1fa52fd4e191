//! PNG encoding. PNG is lossless, so `quality` only trades encoding speed for file size.

use anyhow::{Result, bail};
use image::{
	DynamicImage, ImageEncoder,
	codecs::png::{CompressionType, FilterType, PngEncoder},
};
use tilestitch_core::Blob;
use tilestitch_derive::context;

/// Compression settings for a quality value; higher values compress harder.
fn compression(quality: Option<u8>) -> (CompressionType, FilterType) {
	let Some(quality) = quality else {
		return (CompressionType::Default, FilterType::Adaptive);
	};
	match quality {
		0..20 => (CompressionType::Fast, FilterType::NoFilter),
		20..40 => (CompressionType::Fast, FilterType::Avg),
		40..60 => (CompressionType::Default, FilterType::Avg),
		60..80 => (CompressionType::Default, FilterType::Paeth),
		80..90 => (CompressionType::Default, FilterType::Adaptive),
		_ => (CompressionType::Best, FilterType::Adaptive),
	}
}

#[context("encoding {}x{} image as PNG (q={:?})", image.width(), image.height(), quality)]
pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Blob> {
	if image.color().bytes_per_pixel() / image.color().channel_count() != 1 {
		bail!("PNG output only supports 8-bit images");
	}

	let (compression_type, filter_type) = compression(quality);
	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new_with_quality(&mut buffer, compression_type, filter_type).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	Ok(Blob::from(buffer))
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{ImageFormat, Rgba, RgbaImage, load_from_memory_with_format};
	use rstest::rstest;

	#[rstest]
	#[case(None)]
	#[case(Some(0))]
	#[case(Some(50))]
	#[case(Some(100))]
	fn lossless_at_every_quality(#[case] quality: Option<u8>) {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 16, |x, y| {
			Rgba([(x * 16) as u8, (y * 16) as u8, 128, (x + y) as u8 * 8])
		}));
		let blob = encode(&image, quality).unwrap();
		let decoded = load_from_memory_with_format(blob.as_slice(), ImageFormat::Png).unwrap();
		assert_eq!(decoded.to_rgba8(), image.to_rgba8());
	}

	#[test]
	fn higher_quality_is_not_larger() {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(64, 64, |x, y| Rgba([x as u8, y as u8, 0, 255])));
		let fast = encode(&image, Some(0)).unwrap();
		let best = encode(&image, Some(100)).unwrap();
		assert!(best.len() <= fast.len());
	}

	#[test]
	fn rejects_16_bit_images() {
		let image = DynamicImage::new_rgba16(2, 2);
		let error = encode(&image, None).unwrap_err();
		assert_eq!(format!("{error:#}"), "encoding 2x2 image as PNG (q=None): PNG output only supports 8-bit images");
	}
}
