//! Error taxonomy of a stitch request.
//!
//! All functions in this workspace return [`anyhow::Result`]. Failures that callers may want to
//! react to are raised as (or wrapped in the context of) a [`StitchError`], which can be
//! recovered from any error with [`anyhow::Error::downcast_ref`]:
//!
//! ```rust
//! use tilestitch_core::{Dimensions, StitchError, resolve_dimensions_from_size};
//!
//! let error = resolve_dimensions_from_size(Dimensions::new(800, 600), 2.0, 1000).unwrap_err();
//! assert!(matches!(
//!     error.downcast_ref::<StitchError>(),
//!     Some(StitchError::TooLarge { width: 1600, .. })
//! ));
//! ```
//!
//! For [`StitchError::TileFetch`] and [`StitchError::Composition`] the error of the tile source or
//! compositor stays in the chain unchanged and is available as [`anyhow::Error::root_cause`].

use crate::TileAddress;
use std::fmt;

/// The kinds of failure a stitch request can end with.
#[derive(Debug, Clone, PartialEq)]
pub enum StitchError {
	/// Invalid or incomplete request options; raised before any I/O.
	Configuration(String),
	/// The projected bounding box (or the resolved canvas) has no positive area.
	InvalidExtent { width: f64, height: f64 },
	/// The resolved canvas meets or exceeds the configured size limit.
	TooLarge { width: u32, height: u32, limit: u32 },
	/// Tile enumeration produced no tiles.
	EmptyGrid,
	/// A tile source failed for this address; the source error is the cause.
	TileFetch { address: TileAddress },
	/// The compositor failed; the compositor error is the cause.
	Composition,
	/// The fetch phase produced no usable tiles.
	NoTiles,
}

impl fmt::Display for StitchError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StitchError::Configuration(message) => write!(f, "invalid configuration: {message}"),
			StitchError::InvalidExtent { width, height } => {
				write!(f, "invalid extent: {width}x{height} pixels has no positive area")
			}
			StitchError::TooLarge { width, height, limit } => {
				write!(f, "desired image is too large: {width}x{height} pixels, limit is {limit}")
			}
			StitchError::EmptyGrid => write!(f, "no tiles cover the requested extent"),
			StitchError::TileFetch { address } => write!(f, "failed to fetch tile {address}"),
			StitchError::Composition => write!(f, "failed to composite tiles"),
			StitchError::NoTiles => write!(f, "no tiles were fetched"),
		}
	}
}

impl std::error::Error for StitchError {}

/// Returns early with a [`StitchError::Configuration`] built from a format string.
#[macro_export]
macro_rules! config_bail {
	($($arg:tt)*) => {
		return Err(anyhow::Error::new($crate::StitchError::Configuration(format!($($arg)*))))
	};
}
