//! Geographic input types: [`GeoPoint`] and [`GeoBBox`].
//!
//! Both are plain WGS84 degrees. Neither type clamps or validates its range; latitude values
//! that cannot be projected are the caller's responsibility.

use crate::config_bail;
use anyhow::Result;
use serde::Deserialize;
use std::fmt::{self, Debug};

/// A longitude/latitude pair in degrees.
#[derive(Clone, Copy, PartialEq)]
pub struct GeoPoint {
	pub lng: f64,
	pub lat: f64,
}

impl GeoPoint {
	#[must_use]
	pub fn new(lng: f64, lat: f64) -> GeoPoint {
		GeoPoint { lng, lat }
	}
}

impl Debug for GeoPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GeoPoint({}, {})", self.lng, self.lat)
	}
}

/// A geographic bounding box, `[west, south, east, north]` in degrees.
///
/// Deserializes from a four-element array:
///
/// ```rust
/// use tilestitch_core::GeoBBox;
///
/// let bbox = GeoBBox::try_from(vec![-60.0, -60.0, 60.0, 60.0]).unwrap();
/// assert_eq!(bbox.as_array(), [-60.0, -60.0, 60.0, 60.0]);
/// assert!(GeoBBox::try_from(vec![1.0, 2.0]).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct GeoBBox {
	pub west: f64,
	pub south: f64,
	pub east: f64,
	pub north: f64,
}

impl GeoBBox {
	#[must_use]
	pub fn new(west: f64, south: f64, east: f64, north: f64) -> GeoBBox {
		GeoBBox {
			west,
			south,
			east,
			north,
		}
	}

	/// The south-west corner.
	#[must_use]
	pub fn bottom_left(&self) -> GeoPoint {
		GeoPoint::new(self.west, self.south)
	}

	/// The north-east corner.
	#[must_use]
	pub fn top_right(&self) -> GeoPoint {
		GeoPoint::new(self.east, self.north)
	}

	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.west, self.south, self.east, self.north]
	}
}

impl TryFrom<Vec<f64>> for GeoBBox {
	type Error = anyhow::Error;

	fn try_from(value: Vec<f64>) -> Result<Self> {
		let &[west, south, east, north] = value.as_slice() else {
			config_bail!("bbox must contain exactly 4 numbers [west, south, east, north], got {value:?}");
		};
		Ok(GeoBBox::new(west, south, east, north))
	}
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GeoBBox({}, {}, {}, {})", self.west, self.south, self.east, self.north)
	}
}
