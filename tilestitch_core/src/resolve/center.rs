use super::project_bbox;
use crate::{Extent, GeoBBox, GeoPoint, PixelPoint, pixel_from_lng_lat};
use anyhow::Result;
use tilestitch_derive::context;

/// Pixel-space midpoint of the projected corners of `bbox`.
///
/// ```
/// use tilestitch_core::{GeoBBox, PixelPoint, center_from_bbox};
///
/// let center = center_from_bbox(&GeoBBox::new(-60.0, -60.0, 60.0, 60.0), 5, 1.0, 256).unwrap();
/// assert_eq!(center, PixelPoint::new(4096.0, 4096.0));
/// ```
#[context("resolving center of {bbox:?} at zoom {zoom}")]
pub fn center_from_bbox(bbox: &GeoBBox, zoom: u8, scale: f64, tile_size: u32) -> Result<PixelPoint> {
	let projected = project_bbox(bbox, zoom, scale, tile_size)?;
	Ok(PixelPoint::new(
		projected.top_right.x - projected.width / 2.0,
		projected.top_right.y + projected.height / 2.0,
	))
}

#[must_use]
pub fn center_from_point(point: GeoPoint, zoom: u8, scale: f64, tile_size: u32) -> PixelPoint {
	pixel_from_lng_lat(point, zoom, scale, tile_size)
}

/// Resolve the pixel-space center of either extent form.
pub fn resolve_center(extent: &Extent, zoom: u8, scale: f64, tile_size: u32) -> Result<PixelPoint> {
	match extent {
		Extent::Center(center) => Ok(center_from_point(center.point(), zoom, scale, tile_size)),
		Extent::BBox(bbox) => center_from_bbox(bbox, zoom, scale, tile_size),
	}
}
