//! Spherical Mercator forward projection into world pixel space.
//!
//! At zoom `z` the world is a square of `tile_size * scale * 2^z` pixels. Longitude -180 and
//! the maximal Mercator latitude map to the origin; `x` grows eastwards and `y` southwards.
//! Projected values are rounded to whole world pixels, matching the tile-grid convention that
//! pixel edges line up with tile edges.
//!
//! ```
//! use tilestitch_core::{GeoPoint, Projection};
//!
//! let projection = Projection::new(256, 1.0);
//! let pixel = projection.pixel_from_lng_lat(GeoPoint::new(0.0, 0.0), 1);
//! assert_eq!((pixel.x, pixel.y), (256.0, 256.0));
//! ```

use crate::{GeoPoint, PixelPoint};
use std::f64::consts::PI;

/// A Mercator tile-pixel projection for one tile size and scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
	tile_size: u32,
	scale: f64,
}

impl Projection {
	#[must_use]
	pub fn new(tile_size: u32, scale: f64) -> Projection {
		Projection { tile_size, scale }
	}

	/// Edge length of the world square in pixels at `zoom`.
	#[must_use]
	pub fn world_size(&self, zoom: u8) -> f64 {
		f64::from(self.tile_size) * self.scale * 2f64.powi(i32::from(zoom))
	}

	/// Project a geographic point to world pixels at `zoom`.
	///
	/// No clamping is applied: latitudes of ±90° project to infinity.
	#[must_use]
	pub fn pixel_from_lng_lat(&self, point: GeoPoint, zoom: u8) -> PixelPoint {
		let size = self.world_size(zoom);
		let half = size / 2.0;
		let sin = (point.lat * PI / 180.0).sin();
		let x = half + point.lng * size / 360.0;
		let y = half - 0.5 * ((1.0 + sin) / (1.0 - sin)).ln() * size / (2.0 * PI);
		PixelPoint::new(x.round(), y.round())
	}
}

/// Project `point` at `zoom` for a world of `tile_size * scale * 2^zoom` pixels.
#[must_use]
pub fn pixel_from_lng_lat(point: GeoPoint, zoom: u8, scale: f64, tile_size: u32) -> PixelPoint {
	Projection::new(tile_size, scale).pixel_from_lng_lat(point, zoom)
}
