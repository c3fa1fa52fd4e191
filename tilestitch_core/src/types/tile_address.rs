//! Slippy-map tile addresses.
//!
//! A [`TileAddress`] names one tile of the `z/x/y` pyramid. Addresses are always inside the
//! grid of their zoom level: the planner wraps columns around the antimeridian and clamps rows
//! at the poles before constructing them.
//!
//! ```
//! use tilestitch_core::TileAddress;
//!
//! let address = TileAddress::new(5, 15, 16).unwrap();
//! assert_eq!(address.to_string(), "5/15/16");
//! assert!(TileAddress::new(1, 2, 0).is_err());
//!
//! // column -1 wraps to the last column, row 7 clamps to the last row
//! assert_eq!(TileAddress::from_grid(1, -1, 7).unwrap(), TileAddress::new(1, 1, 1).unwrap());
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Debug, Display};

/// Highest supported zoom level; keeps `2^z` tile columns and world pixel sizes well inside
/// integer and float precision.
pub const MAX_ZOOM: u8 = 30;

/// A tile identifier `(z, x, y)` with `0 <= x, y < 2^z`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
	/// The zoom level.
	pub z: u8,
	/// The column, counted eastwards from the antimeridian.
	pub x: u32,
	/// The row, counted southwards from the northern edge.
	pub y: u32,
}

impl TileAddress {
	/// Create a new address.
	///
	/// # Errors
	/// Returns an error if `z > MAX_ZOOM` or if `x`/`y` lie outside the grid of zoom `z`.
	pub fn new(z: u8, x: u32, y: u32) -> Result<TileAddress> {
		ensure!(z <= MAX_ZOOM, "zoom ({z}) must be <= {MAX_ZOOM}");
		let count = TileAddress::grid_size(z);
		ensure!(i64::from(x) < count, "x ({x}) out of bounds for zoom {z}");
		ensure!(i64::from(y) < count, "y ({y}) out of bounds for zoom {z}");
		Ok(TileAddress { z, x, y })
	}

	/// Number of tile columns (and rows) at zoom `z`, i.e. `2^z`. Zoom levels above
	/// [`MAX_ZOOM`] count as [`MAX_ZOOM`].
	#[must_use]
	pub fn grid_size(z: u8) -> i64 {
		1i64 << z.min(MAX_ZOOM)
	}

	/// Build an address from unbounded grid coordinates.
	///
	/// The column is taken modulo `2^z` and normalized into `[0, 2^z)`, which repeats the grid
	/// horizontally. The row is clamped into `[0, 2^z)`, which repeats the edge row at the poles.
	///
	/// # Errors
	/// Returns an error if `z > MAX_ZOOM`.
	pub fn from_grid(z: u8, column: i64, row: i64) -> Result<TileAddress> {
		ensure!(z <= MAX_ZOOM, "zoom ({z}) must be <= {MAX_ZOOM}");
		let count = TileAddress::grid_size(z);
		Ok(TileAddress {
			z,
			x: column.rem_euclid(count) as u32,
			y: row.clamp(0, count - 1) as u32,
		})
	}
}

impl Display for TileAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.z, self.x, self.y)
	}
}

impl Debug for TileAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileAddress({}, [{}, {}])", self.z, self.x, self.y)
	}
}
