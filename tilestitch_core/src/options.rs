//! Request options and their validation.
//!
//! [`StitchOptions`] is the request surface: every field has a default and the struct can be
//! deserialized from a config file (except for the tile source, which is set in code).
//! [`StitchOptions::resolve`] checks the options once, before any I/O, and yields
//! [`ResolvedOptions`] with the extent selected and the tile source present.
//!
//! ```
//! use std::sync::Arc;
//! use futures::FutureExt;
//! use tilestitch_core::{Blob, Extent, FetchedTile, StitchOptions, TileSourceFn};
//!
//! let options = StitchOptions {
//!     zoom: 5,
//!     ..StitchOptions::default()
//! }
//! .with_center(0.0, 0.0, 400, 300)
//! .with_tile_source(Arc::new(TileSourceFn::new("empty", |_| {
//!     async { Ok(FetchedTile::new(Blob::new_empty())) }.boxed()
//! })));
//!
//! let resolved = options.resolve().unwrap();
//! assert!(matches!(resolved.extent, Extent::Center(_)));
//! assert_eq!(resolved.limit, 19008);
//! ```

use crate::{
	Dimensions, GeoBBox, GeoPoint, MAX_ZOOM, OutputFormat, PixelPoint, TilePlan, TileSource, config_bail, plan_tiles,
	resolve_center, resolve_dimensions,
};
use anyhow::Result;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};
use tilestitch_derive::context;

/// Default maximum edge length (exclusive) of the output canvas.
pub const DEFAULT_LIMIT: u32 = 19008;

/// Default edge length of a source tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// A center point in degrees plus the requested canvas size before scaling.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CenterInput {
	#[serde(alias = "x")]
	pub lng: f64,
	#[serde(alias = "y")]
	pub lat: f64,
	pub width: u32,
	pub height: u32,
}

impl CenterInput {
	#[must_use]
	pub fn point(&self) -> GeoPoint {
		GeoPoint::new(self.lng, self.lat)
	}

	#[must_use]
	pub fn size(&self) -> Dimensions {
		Dimensions::new(self.width, self.height)
	}
}

/// The geographic extent of a request: exactly one of the two input forms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extent {
	Center(CenterInput),
	BBox(GeoBBox),
}

/// Options of one stitch request.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StitchOptions {
	/// Zoom level of the tiles, `0..=30`.
	pub zoom: u8,
	/// Pixel density multiplier, e.g. 2 for high-DPI output.
	pub scale: f64,
	/// Edge length of an unscaled tile.
	pub tile_size: u32,
	pub format: OutputFormat,
	/// Encoder quality `0..=100`; `None` leaves the choice to the compositor.
	pub quality: Option<u8>,
	/// Canvas sides must stay strictly below this value.
	pub limit: u32,
	pub center: Option<CenterInput>,
	pub bbox: Option<GeoBBox>,
	/// Upper bound on simultaneous tile fetches; `None` fetches all tiles at once.
	pub concurrency: Option<usize>,
	#[serde(skip)]
	pub tile_source: Option<Arc<dyn TileSource>>,
}

impl Default for StitchOptions {
	fn default() -> Self {
		StitchOptions {
			zoom: 0,
			scale: 1.0,
			tile_size: DEFAULT_TILE_SIZE,
			format: OutputFormat::Png,
			quality: None,
			limit: DEFAULT_LIMIT,
			center: None,
			bbox: None,
			concurrency: None,
			tile_source: None,
		}
	}
}

impl StitchOptions {
	#[must_use]
	pub fn with_center(mut self, lng: f64, lat: f64, width: u32, height: u32) -> Self {
		self.center = Some(CenterInput {
			lng,
			lat,
			width,
			height,
		});
		self
	}

	#[must_use]
	pub fn with_bbox(mut self, bbox: GeoBBox) -> Self {
		self.bbox = Some(bbox);
		self
	}

	#[must_use]
	pub fn with_tile_source(mut self, source: Arc<dyn TileSource>) -> Self {
		self.tile_source = Some(source);
		self
	}

	/// Validate the options and apply the extent selection.
	///
	/// Every failure is a [`StitchError::Configuration`](crate::StitchError::Configuration).
	#[context("resolving stitch options")]
	pub fn resolve(&self) -> Result<ResolvedOptions> {
		let Some(tile_source) = self.tile_source.clone() else {
			config_bail!("a tile source is required");
		};

		let extent = match (self.center, self.bbox) {
			(Some(center), None) => Extent::Center(center),
			(None, Some(bbox)) => Extent::BBox(bbox),
			(None, None) => config_bail!("either center or bbox is required"),
			(Some(_), Some(_)) => config_bail!("center and bbox are mutually exclusive"),
		};

		if self.zoom > MAX_ZOOM {
			config_bail!("zoom ({}) must be <= {MAX_ZOOM}", self.zoom);
		}
		if !(self.scale.is_finite() && self.scale > 0.0) {
			config_bail!("scale ({}) must be a positive number", self.scale);
		}
		if self.tile_size == 0 {
			config_bail!("tile size must be > 0");
		}
		if (f64::from(self.tile_size) * self.scale).floor() < 1.0 {
			config_bail!(
				"scaled tile size ({} * {}) must be at least one pixel",
				self.tile_size,
				self.scale
			);
		}
		if let Some(quality) = self.quality
			&& quality > 100
		{
			config_bail!("quality ({quality}) must be <= 100");
		}
		if self.limit == 0 {
			config_bail!("limit must be > 0");
		}
		if self.concurrency == Some(0) {
			config_bail!("concurrency must be > 0");
		}

		log::trace!("resolved extent {extent:?} at zoom {} and scale {}", self.zoom, self.scale);

		Ok(ResolvedOptions {
			zoom: self.zoom,
			scale: self.scale,
			tile_size: self.tile_size,
			format: self.format,
			quality: self.quality,
			limit: self.limit,
			extent,
			concurrency: self.concurrency,
			tile_source,
		})
	}
}

/// Validated options of one stitch request.
#[derive(Clone, Debug)]
pub struct ResolvedOptions {
	pub zoom: u8,
	pub scale: f64,
	pub tile_size: u32,
	pub format: OutputFormat,
	pub quality: Option<u8>,
	pub limit: u32,
	pub extent: Extent,
	pub concurrency: Option<usize>,
	pub tile_source: Arc<dyn TileSource>,
}

impl ResolvedOptions {
	/// Pixel-space center of the extent.
	pub fn center(&self) -> Result<PixelPoint> {
		resolve_center(&self.extent, self.zoom, self.scale, self.tile_size)
	}

	/// Output canvas size of the extent.
	pub fn dimensions(&self) -> Result<Dimensions> {
		resolve_dimensions(&self.extent, self.zoom, self.scale, self.tile_size, self.limit)
	}

	/// Tile addresses and canvas offsets covering the extent.
	pub fn plan(&self) -> Result<(Dimensions, TilePlan)> {
		let center = self.center()?;
		let dimensions = self.dimensions()?;
		let plan = plan_tiles(center, dimensions, self.zoom, self.scale, self.tile_size)?;
		Ok((dimensions, plan))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Blob, FetchedTile, StitchError, TileSourceFn};
	use futures::FutureExt;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn source() -> Arc<dyn TileSource> {
		Arc::new(TileSourceFn::new("test", |_| {
			async { Ok(FetchedTile::new(Blob::from("tile"))) }.boxed()
		}))
	}

	fn configuration_error(options: &StitchOptions) -> String {
		let error = options.resolve().unwrap_err();
		match error.downcast_ref::<StitchError>() {
			Some(StitchError::Configuration(message)) => message.clone(),
			other => panic!("expected a configuration error, got {other:?}"),
		}
	}

	#[test]
	fn defaults() {
		let options = StitchOptions::default();
		assert_eq!(options.zoom, 0);
		assert_eq!(options.scale, 1.0);
		assert_eq!(options.tile_size, 256);
		assert_eq!(options.format, OutputFormat::Png);
		assert_eq!(options.quality, None);
		assert_eq!(options.limit, 19008);
		assert_eq!(options.concurrency, None);
	}

	#[test]
	fn resolves_center_and_bbox() {
		let resolved = StitchOptions::default()
			.with_center(1.0, 2.0, 3, 4)
			.with_tile_source(source())
			.resolve()
			.unwrap();
		assert_eq!(
			resolved.extent,
			Extent::Center(CenterInput {
				lng: 1.0,
				lat: 2.0,
				width: 3,
				height: 4
			})
		);

		let bbox = GeoBBox::new(-1.0, -1.0, 1.0, 1.0);
		let resolved = StitchOptions::default()
			.with_bbox(bbox)
			.with_tile_source(source())
			.resolve()
			.unwrap();
		assert_eq!(resolved.extent, Extent::BBox(bbox));
	}

	#[test]
	fn missing_tile_source() {
		let options = StitchOptions::default().with_center(0.0, 0.0, 10, 10);
		assert_eq!(configuration_error(&options), "a tile source is required");
		assert_eq!(
			format!("{:#}", options.resolve().unwrap_err()),
			"resolving stitch options: invalid configuration: a tile source is required"
		);
	}

	#[test]
	fn missing_or_conflicting_extent() {
		let options = StitchOptions::default().with_tile_source(source());
		assert_eq!(configuration_error(&options), "either center or bbox is required");

		let options = options
			.with_center(0.0, 0.0, 10, 10)
			.with_bbox(GeoBBox::new(-1.0, -1.0, 1.0, 1.0));
		assert_eq!(configuration_error(&options), "center and bbox are mutually exclusive");
	}

	#[rstest]
	#[case(StitchOptions { zoom: 31, ..StitchOptions::default() }, "zoom (31) must be <= 30")]
	#[case(StitchOptions { scale: 0.0, ..StitchOptions::default() }, "scale (0) must be a positive number")]
	#[case(StitchOptions { scale: -2.0, ..StitchOptions::default() }, "scale (-2) must be a positive number")]
	#[case(StitchOptions { scale: f64::NAN, ..StitchOptions::default() }, "scale (NaN) must be a positive number")]
	#[case(StitchOptions { tile_size: 0, ..StitchOptions::default() }, "tile size must be > 0")]
	#[case(StitchOptions { scale: 0.001, ..StitchOptions::default() }, "scaled tile size (256 * 0.001) must be at least one pixel")]
	#[case(StitchOptions { quality: Some(101), ..StitchOptions::default() }, "quality (101) must be <= 100")]
	#[case(StitchOptions { limit: 0, ..StitchOptions::default() }, "limit must be > 0")]
	#[case(StitchOptions { concurrency: Some(0), ..StitchOptions::default() }, "concurrency must be > 0")]
	fn invalid_values(#[case] options: StitchOptions, #[case] message: &str) {
		let options = options.with_center(0.0, 0.0, 10, 10).with_tile_source(source());
		assert_eq!(configuration_error(&options), message);
	}

	#[test]
	fn deserialize() {
		let options: StitchOptions = serde_yaml_ng::from_str(
			"zoom: 5\nscale: 2\nformat: jpeg\nquality: 80\ncenter: { x: 13.4, y: 52.5, width: 400, height: 300 }\n",
		)
		.unwrap();
		assert_eq!(options.zoom, 5);
		assert_eq!(options.scale, 2.0);
		assert_eq!(options.format, OutputFormat::Jpeg);
		assert_eq!(options.quality, Some(80));
		assert_eq!(options.tile_size, 256);
		assert_eq!(
			options.center,
			Some(CenterInput {
				lng: 13.4,
				lat: 52.5,
				width: 400,
				height: 300
			})
		);
		assert!(options.tile_source.is_none());

		let options: StitchOptions = serde_yaml_ng::from_str("bbox: [-60, -60, 60, 60]\nlimit: 5000").unwrap();
		assert_eq!(options.bbox, Some(GeoBBox::new(-60.0, -60.0, 60.0, 60.0)));
		assert_eq!(options.limit, 5000);

		assert!(serde_yaml_ng::from_str::<StitchOptions>("zoom: 1\ncolour: red").is_err());
		assert!(serde_yaml_ng::from_str::<StitchOptions>("format: gif").is_err());
	}

	#[test]
	fn plan_from_resolved_options() {
		let (dimensions, plan) = StitchOptions {
			zoom: 5,
			..StitchOptions::default()
		}
		.with_bbox(GeoBBox::new(-60.0, -60.0, 60.0, 60.0))
		.with_tile_source(source())
		.resolve()
		.unwrap()
		.plan()
		.unwrap();

		assert_eq!(dimensions, Dimensions::new(2730, 3434));
		assert_eq!(plan.len(), plan.offsets.len());
		assert!(!plan.is_empty());
	}
}
