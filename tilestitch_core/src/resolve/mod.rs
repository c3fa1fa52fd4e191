//! Turns a request extent into the pixel-space center and the output canvas size.
//!
//! Both resolvers accept either extent form. A bounding box is projected once per resolver;
//! the projection is pure and cheap, so the two stay independent of each other.

mod center;
pub use center::*;

mod dimensions;
pub use dimensions::*;

use crate::{GeoBBox, PixelPoint, StitchError, pixel_from_lng_lat};
use anyhow::{Result, bail};

/// The projected corners of a bounding box and its pixel extent.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ProjectedBBox {
	top_right: PixelPoint,
	width: f64,
	height: f64,
}

/// Project the south-west and north-east corners of `bbox`.
///
/// Fails with [`StitchError::InvalidExtent`] unless both sides are strictly positive.
fn project_bbox(bbox: &GeoBBox, zoom: u8, scale: f64, tile_size: u32) -> Result<ProjectedBBox> {
	let bottom_left = pixel_from_lng_lat(bbox.bottom_left(), zoom, scale, tile_size);
	let top_right = pixel_from_lng_lat(bbox.top_right(), zoom, scale, tile_size);
	let width = top_right.x - bottom_left.x;
	let height = bottom_left.y - top_right.y;

	// poles project to infinity
	if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
		bail!(StitchError::InvalidExtent { width, height });
	}

	Ok(ProjectedBBox {
		top_right,
		width,
		height,
	})
}
