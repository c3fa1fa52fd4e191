//! Tile grid planning: which tiles cover a canvas and where each one is drawn.
//!
//! The canvas center is converted to fractional tile-grid coordinates using the unscaled tile
//! size, while the footprint of a tile on the canvas uses the scaled size
//! `floor(tile_size * scale)`. Cells are enumerated column by column, rows ascending inside a
//! column; addresses and offsets come out of the same pass and are paired by index.
//!
//! ```
//! use tilestitch_core::{Dimensions, PixelPoint, TileAddress, TileOffset, plan_tiles};
//!
//! let plan = plan_tiles(PixelPoint::new(4096.0, 4096.0), Dimensions::new(1824, 1832), 5, 4.0, 256).unwrap();
//! assert_eq!(plan.addresses[0], TileAddress::new(5, 15, 15).unwrap());
//! assert_eq!(plan.offsets[0], TileOffset::new(-112, -108));
//! ```

use crate::{Dimensions, MAX_ZOOM, PixelPoint, StitchError, TileAddress, TileOffset, config_bail};
use anyhow::{Result, bail};
use std::ops::RangeInclusive;

/// Tile addresses and their canvas offsets, index-aligned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TilePlan {
	pub addresses: Vec<TileAddress>,
	pub offsets: Vec<TileOffset>,
}

impl TilePlan {
	#[must_use]
	pub fn len(&self) -> usize {
		self.addresses.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.addresses.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&TileAddress, &TileOffset)> {
		self.addresses.iter().zip(self.offsets.iter())
	}
}

/// The unwrapped grid cells covering a canvas, plus what is needed to place them.
struct GridCells {
	zoom: u8,
	/// Fractional column and row of the canvas center.
	center: (f64, f64),
	/// Edge length of a tile on the canvas.
	size: f64,
	dimensions: (f64, f64),
	columns: RangeInclusive<i64>,
	rows: RangeInclusive<i64>,
}

impl GridCells {
	fn new(center: PixelPoint, dimensions: Dimensions, zoom: u8, scale: f64, tile_size: u32) -> Result<GridCells> {
		if zoom > MAX_ZOOM {
			config_bail!("zoom ({zoom}) must be <= {MAX_ZOOM}");
		}
		let size = (f64::from(tile_size) * scale).floor();
		if !(size >= 1.0) {
			config_bail!("scaled tile size ({tile_size} * {scale}) must be at least one pixel");
		}

		let tile_size = f64::from(tile_size);
		let center = (center.x / tile_size, center.y / tile_size);
		let (width, height) = dimensions.as_f64();

		let cell = |point: (f64, f64)| {
			(
				(center.0 + (point.0 - width / 2.0) / size).floor() as i64,
				(center.1 + (point.1 - height / 2.0) / size).floor() as i64,
			)
		};
		let top_left = cell((0.0, 0.0));
		let bottom_right = cell((width, height));

		Ok(GridCells {
			zoom,
			center,
			size,
			dimensions: (width, height),
			columns: top_left.0..=bottom_right.0,
			rows: top_left.1..=bottom_right.1,
		})
	}

	/// Enumerate `(column, row)` pairs, column outer, row inner.
	fn cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
		self.columns
			.clone()
			.flat_map(move |column| self.rows.clone().map(move |row| (column, row)))
	}

	fn address(&self, (column, row): (i64, i64)) -> Result<TileAddress> {
		TileAddress::from_grid(self.zoom, column, row)
	}

	fn offset(&self, (column, row): (i64, i64)) -> TileOffset {
		let x = self.dimensions.0 / 2.0 + self.size * (column as f64 - self.center.0);
		let y = self.dimensions.1 / 2.0 + self.size * (row as f64 - self.center.1);
		TileOffset::new(x.round() as i64, y.round() as i64)
	}
}

/// Plan the tiles covering a canvas of `dimensions` centered on the world pixel `center`.
///
/// Columns wrap around the antimeridian and rows clamp at the poles, so a canvas wider or
/// taller than the world repeats tiles instead of leaving gaps. Offsets are neither wrapped
/// nor clamped. Fails with [`StitchError::EmptyGrid`] if no cell is enumerated.
pub fn plan_tiles(
	center: PixelPoint,
	dimensions: Dimensions,
	zoom: u8,
	scale: f64,
	tile_size: u32,
) -> Result<TilePlan> {
	let grid = GridCells::new(center, dimensions, zoom, scale, tile_size)?;

	let mut addresses = Vec::new();
	let mut offsets = Vec::new();
	for cell in grid.cells() {
		addresses.push(grid.address(cell)?);
		offsets.push(grid.offset(cell));
	}

	if addresses.is_empty() {
		bail!(StitchError::EmptyGrid);
	}

	log::debug!(
		"planned {} tiles at zoom {zoom}: columns {:?}, rows {:?}",
		addresses.len(),
		grid.columns,
		grid.rows
	);

	Ok(TilePlan { addresses, offsets })
}

/// The tile addresses of [`plan_tiles`] for the same inputs.
pub fn tile_list(
	center: PixelPoint,
	dimensions: Dimensions,
	zoom: u8,
	scale: f64,
	tile_size: u32,
) -> Result<Vec<TileAddress>> {
	Ok(plan_tiles(center, dimensions, zoom, scale, tile_size)?.addresses)
}

/// The canvas offsets of [`plan_tiles`] for the same inputs.
pub fn offset_list(
	center: PixelPoint,
	dimensions: Dimensions,
	zoom: u8,
	scale: f64,
	tile_size: u32,
) -> Result<Vec<TileOffset>> {
	Ok(plan_tiles(center, dimensions, zoom, scale, tile_size)?.offsets)
}
