//! Concurrent fetch of planned tiles and hand-off to the compositor.
//!
//! The fetch phase is all-or-nothing: the first failing tile fails the whole stitch and no
//! partial image is produced. Tiles are reassembled in plan order, not in completion order,
//! because offsets are paired with tiles by index.

use crate::{
	Blob, CompositeTarget, Compositor, Dimensions, FetchedTile, OutputFormat, PositionedTile, StitchError,
	StitchHeaders, StitchOptions, TileAddress, TilePlan, TileSource, merge_headers,
};
use anyhow::{Context, Result, bail};
use futures::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;
use tilestitch_derive::context;
use time::OffsetDateTime;

/// Aggregate statistics of one stitch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StitchStats {
	/// Number of fetched tiles.
	pub tiles: usize,
	/// Mean render time of the tiles in milliseconds, rounded; missing values count as 0.
	pub render_avg: u64,
}

impl StitchStats {
	fn from_tiles(tiles: &[FetchedTile]) -> StitchStats {
		if tiles.is_empty() {
			return StitchStats::default();
		}
		let sum: u64 = tiles.iter().map(|tile| tile.stats.render.unwrap_or(0)).sum();
		StitchStats {
			tiles: tiles.len(),
			render_avg: (sum as f64 / tiles.len() as f64).round() as u64,
		}
	}
}

/// The outcome of a successful stitch.
#[derive(Clone, Debug, PartialEq)]
pub struct StitchResult {
	pub image: Blob,
	pub stats: StitchStats,
	pub headers: StitchHeaders,
}

/// Fetches the tiles of a [`TilePlan`] and composites them.
#[derive(Clone, Debug)]
pub struct Stitcher {
	source: Arc<dyn TileSource>,
	compositor: Arc<dyn Compositor>,
	concurrency: Option<usize>,
}

impl Stitcher {
	#[must_use]
	pub fn new(source: Arc<dyn TileSource>, compositor: Arc<dyn Compositor>) -> Stitcher {
		Stitcher {
			source,
			compositor,
			concurrency: None,
		}
	}

	/// Limit the number of tile fetches in flight; `None` starts all of them at once.
	#[must_use]
	pub fn with_concurrency(mut self, concurrency: Option<usize>) -> Stitcher {
		self.concurrency = concurrency;
		self
	}

	/// Fetch every tile of `plan`, composite them onto a canvas of `dimensions` and merge their
	/// headers.
	#[context("stitching {} tiles into {dimensions:?}", plan.len())]
	pub async fn stitch(
		&self,
		plan: &TilePlan,
		dimensions: Dimensions,
		format: OutputFormat,
		quality: Option<u8>,
	) -> Result<StitchResult> {
		if plan.is_empty() {
			bail!(StitchError::NoTiles);
		}

		let tiles = self.fetch_all(&plan.addresses).await?;
		if tiles.iter().all(|tile| tile.blob.is_empty()) {
			bail!(StitchError::NoTiles);
		}

		let stats = StitchStats::from_tiles(&tiles);
		let tile_headers: Vec<_> = tiles.iter().map(|tile| tile.headers.clone()).collect();
		let headers = merge_headers(&tile_headers, format, OffsetDateTime::now_utc());

		let positioned: Vec<PositionedTile> = tiles
			.into_iter()
			.zip(plan.offsets.iter())
			.filter(|(tile, _)| !tile.blob.is_empty())
			.map(|(tile, offset)| PositionedTile {
				blob: tile.blob,
				x: offset.x,
				y: offset.y,
			})
			.collect();

		let target = CompositeTarget {
			width: dimensions.width,
			height: dimensions.height,
			format,
			quality,
			reencode: true,
		};
		log::debug!("compositing {} tiles into {target:?}", positioned.len());

		let image = self
			.compositor
			.compose(positioned, target)
			.await
			.context(StitchError::Composition)?;

		log::debug!("stitched {} bytes, {stats:?}", image.len());
		Ok(StitchResult { image, stats, headers })
	}

	/// Fetch all addresses, at most `concurrency` at a time, and return the tiles in address order.
	async fn fetch_all(&self, addresses: &[TileAddress]) -> Result<Vec<FetchedTile>> {
		let limit = self.concurrency.unwrap_or(addresses.len()).max(1);
		log::trace!("fetching {} tiles, {limit} at a time", addresses.len());

		let source = &self.source;
		let mut tiles: Vec<(usize, FetchedTile)> = stream::iter(addresses.iter().copied().enumerate())
			.map(|(index, address)| async move {
				let tile = source
					.get_tile(address)
					.await
					.with_context(|| StitchError::TileFetch { address })?;
				Ok::<_, anyhow::Error>((index, tile))
			})
			.buffer_unordered(limit)
			.try_collect()
			.await?;

		tiles.sort_unstable_by_key(|(index, _)| *index);
		Ok(tiles.into_iter().map(|(_, tile)| tile).collect())
	}
}

/// Resolve `options`, plan the tiles and stitch them with `compositor`.
///
/// Configuration and geometry errors are raised before any tile is fetched.
pub async fn stitch(options: &StitchOptions, compositor: Arc<dyn Compositor>) -> Result<StitchResult> {
	let resolved = options.resolve()?;
	let (dimensions, plan) = resolved.plan()?;

	Stitcher::new(Arc::clone(&resolved.tile_source), compositor)
		.with_concurrency(resolved.concurrency)
		.stitch(&plan, dimensions, resolved.format, resolved.quality)
		.await
}
