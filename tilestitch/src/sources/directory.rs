//! Tiles from a local `{z}/{x}/{y}.{extension}` directory tree.
//!
//! A missing tile file is an error, like any other failed fetch. The file's modification time
//! becomes the tile's `Last-Modified` header.

use anyhow::{Result, ensure};
use async_trait::async_trait;
use std::{
	path::{Path, PathBuf},
	time::Instant,
};
use tilestitch_core::{Blob, FetchedTile, TileAddress, TileHeaders, TileSource, TileStats, format_http_date};
use tilestitch_derive::context;
use time::OffsetDateTime;

#[derive(Debug)]
pub struct DirectoryTileSource {
	root: PathBuf,
	extension: String,
}

impl DirectoryTileSource {
	#[context("opening tile directory {path:?}")]
	pub fn new(path: &Path, extension: &str) -> Result<DirectoryTileSource> {
		ensure!(path.is_dir(), "{path:?} is not a directory");
		let extension = extension.trim_start_matches('.');
		ensure!(!extension.is_empty(), "tile file extension must not be empty");

		Ok(DirectoryTileSource {
			root: path.to_path_buf(),
			extension: extension.to_string(),
		})
	}

	/// The file holding the tile at `address`.
	#[must_use]
	pub fn tile_path(&self, address: TileAddress) -> PathBuf {
		self
			.root
			.join(address.z.to_string())
			.join(address.x.to_string())
			.join(format!("{}.{}", address.y, self.extension))
	}

	#[context("reading tile {address} from {:?}", self.root)]
	pub async fn read(&self, address: TileAddress) -> Result<FetchedTile> {
		let start = Instant::now();
		let path = self.tile_path(address);

		let data = tokio::fs::read(&path).await?;
		let modified = tokio::fs::metadata(&path).await?.modified()?;

		let headers = TileHeaders::new().with("Last-Modified", format_http_date(OffsetDateTime::from(modified)));
		let render = start.elapsed().as_millis() as u64;
		log::trace!("read {} bytes from {path:?}", data.len());

		Ok(FetchedTile::new(Blob::from(data))
			.with_headers(headers)
			.with_stats(TileStats::with_render(render)))
	}
}

#[async_trait]
impl TileSource for DirectoryTileSource {
	async fn get_tile(&self, address: TileAddress) -> Result<FetchedTile> {
		self.read(address).await
	}
}
