//! Pixel-space types: world pixel locations, canvas sizes and canvas offsets.

use std::fmt::{self, Debug};

/// A location in the world pixel space of one zoom/scale/tile-size triple.
///
/// The whole world spans `tile_size * scale * 2^zoom` pixels in both directions, with the
/// origin at the top-left (longitude -180, maximal latitude).
#[derive(Clone, Copy, PartialEq)]
pub struct PixelPoint {
	pub x: f64,
	pub y: f64,
}

impl PixelPoint {
	#[must_use]
	pub fn new(x: f64, y: f64) -> PixelPoint {
		PixelPoint { x, y }
	}
}

impl Debug for PixelPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PixelPoint({}, {})", self.x, self.y)
	}
}

/// Size of the output canvas in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
	pub width: u32,
	pub height: u32,
}

impl Dimensions {
	#[must_use]
	pub fn new(width: u32, height: u32) -> Dimensions {
		Dimensions { width, height }
	}

	/// Width and height as floats, the unit used by the grid math.
	#[must_use]
	pub fn as_f64(&self) -> (f64, f64) {
		(f64::from(self.width), f64::from(self.height))
	}
}

impl Debug for Dimensions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Dimensions({}x{})", self.width, self.height)
	}
}

/// Position of a tile's top-left corner on the output canvas.
///
/// Offsets are never wrapped or clamped, so they may be negative or lie beyond the canvas.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileOffset {
	pub x: i64,
	pub y: i64,
}

impl TileOffset {
	#[must_use]
	pub fn new(x: i64, y: i64) -> TileOffset {
		TileOffset { x, y }
	}
}

impl Debug for TileOffset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileOffset({}, {})", self.x, self.y)
	}
}
