use super::project_bbox;
use crate::{Dimensions, Extent, GeoBBox, StitchError};
use anyhow::{Result, bail};
use tilestitch_derive::context;

/// Canvas size of a projected bounding box, multiplied by `scale`.
///
/// ```
/// use tilestitch_core::{Dimensions, GeoBBox, resolve_dimensions_from_bbox};
///
/// let bbox = GeoBBox::new(-60.0, -60.0, 60.0, 60.0);
/// let dimensions = resolve_dimensions_from_bbox(&bbox, 5, 1.0, 256, 19008).unwrap();
/// assert_eq!(dimensions, Dimensions::new(2730, 3434));
/// ```
#[context("resolving dimensions of {bbox:?} at zoom {zoom}")]
pub fn resolve_dimensions_from_bbox(
	bbox: &GeoBBox,
	zoom: u8,
	scale: f64,
	tile_size: u32,
	limit: u32,
) -> Result<Dimensions> {
	let projected = project_bbox(bbox, zoom, scale, tile_size)?;
	check_dimensions(projected.width * scale, projected.height * scale, limit)
}

/// Canvas size of explicitly requested dimensions, multiplied by `scale`.
#[context("resolving dimensions of {size:?} at scale {scale}")]
pub fn resolve_dimensions_from_size(size: Dimensions, scale: f64, limit: u32) -> Result<Dimensions> {
	let (width, height) = size.as_f64();
	check_dimensions(width * scale, height * scale, limit)
}

/// Resolve the canvas size of either extent form.
pub fn resolve_dimensions(extent: &Extent, zoom: u8, scale: f64, tile_size: u32, limit: u32) -> Result<Dimensions> {
	match extent {
		Extent::Center(center) => resolve_dimensions_from_size(center.size(), scale, limit),
		Extent::BBox(bbox) => resolve_dimensions_from_bbox(bbox, zoom, scale, tile_size, limit),
	}
}

fn check_dimensions(width: f64, height: f64, limit: u32) -> Result<Dimensions> {
	let (width, height) = (width.round(), height.round());
	if !(width >= 1.0 && height >= 1.0) {
		bail!(StitchError::InvalidExtent { width, height });
	}

	let max = f64::from(limit);
	if width >= max || height >= max {
		bail!(StitchError::TooLarge {
			width: width as u32,
			height: height as u32,
			limit,
		});
	}

	log::trace!("resolved canvas of {width}x{height} pixels");
	Ok(Dimensions::new(width as u32, height as u32))
}
