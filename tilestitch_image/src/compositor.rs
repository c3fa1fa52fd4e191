use crate::format::{decode, encode, image_format, sniff_format};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use image::{DynamicImage, ImageReader, RgbaImage, imageops::overlay};
use std::io::Cursor;
use tilestitch_core::{Blob, CompositeTarget, Compositor, PositionedTile};
use tilestitch_derive::context;

/// Composites raster tiles with the `image` crate.
///
/// Decoding and encoding are CPU-bound and run on tokio's blocking thread pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCompositor;

impl ImageCompositor {
	#[must_use]
	pub fn new() -> ImageCompositor {
		ImageCompositor
	}
}

#[async_trait]
impl Compositor for ImageCompositor {
	async fn compose(&self, tiles: Vec<PositionedTile>, target: CompositeTarget) -> Result<Blob> {
		if image_format(target.format).is_none() {
			bail!("cannot composite raster tiles into {}", target.format);
		}

		if !target.reencode
			&& let Some(blob) = passthrough(&tiles, &target)
		{
			log::debug!("passing a single {}x{} tile through", target.width, target.height);
			return Ok(blob);
		}

		tokio::task::spawn_blocking(move || composite(&tiles, &target))
			.await
			.context("compositing task failed")?
	}
}

/// The bytes of a single tile that already is the requested image.
fn passthrough(tiles: &[PositionedTile], target: &CompositeTarget) -> Option<Blob> {
	let [tile] = tiles else {
		return None;
	};
	if tile.x != 0 || tile.y != 0 {
		return None;
	}
	if sniff_format(&tile.blob).ok()? != image_format(target.format)? {
		return None;
	}
	let dimensions = ImageReader::new(Cursor::new(tile.blob.as_slice()))
		.with_guessed_format()
		.ok()?
		.into_dimensions()
		.ok()?;
	(dimensions == (target.width, target.height)).then(|| tile.blob.clone())
}

/// Draw all tiles in order onto a transparent canvas and encode it.
#[context("compositing {} tiles into a {}x{} {} image", tiles.len(), target.width, target.height, target.format)]
fn composite(tiles: &[PositionedTile], target: &CompositeTarget) -> Result<Blob> {
	let mut canvas = RgbaImage::new(target.width, target.height);
	for (index, tile) in tiles.iter().enumerate() {
		let image = decode(&tile.blob).with_context(|| format!("tile #{index} at ({}, {})", tile.x, tile.y))?;
		// crops against the canvas and alpha-blends
		overlay(&mut canvas, &image.to_rgba8(), tile.x, tile.y);
	}
	encode(&DynamicImage::ImageRgba8(canvas), target.format, target.quality)
}
