//! WebP encoding. The `image` crate only writes lossless WebP, so `quality` is ignored.

use anyhow::Result;
use image::{DynamicImage, codecs::webp::WebPEncoder};
use tilestitch_core::Blob;
use tilestitch_derive::context;

#[context("encoding {}x{} image as WebP", image.width(), image.height())]
pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Blob> {
	if let Some(quality) = quality {
		log::debug!("ignoring quality {quality}, WebP output is lossless");
	}

	let rgba = image.to_rgba8();
	let mut buffer: Vec<u8> = Vec::new();
	WebPEncoder::new_lossless(&mut buffer).encode(
		rgba.as_raw(),
		rgba.width(),
		rgba.height(),
		image::ExtendedColorType::Rgba8,
	)?;

	Ok(Blob::from(buffer))
}
