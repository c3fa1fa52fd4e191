//! Tile sources the command line can open.
//!
//! A location starting with `http://` or `https://` is a URL template, anything else is a tile
//! directory. A directory may carry the tile file extension after a `#`, e.g. `tiles#jpg`;
//! it defaults to `png`.

mod directory;
mod http;

pub use directory::DirectoryTileSource;
pub use http::{DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT, HttpTileSource, MAX_RETRIES};

use anyhow::Result;
use std::{path::Path, sync::Arc};
use tilestitch_core::TileSource;
use tilestitch_derive::context;

/// Tile file extension of a directory location without a `#` suffix.
pub const DEFAULT_EXTENSION: &str = "png";

/// Whether `location` is a URL template rather than a directory.
#[must_use]
pub fn is_url(location: &str) -> bool {
	location.starts_with("http://") || location.starts_with("https://")
}

/// Split a directory location into its path and tile file extension.
#[must_use]
pub fn split_extension(location: &str) -> (&str, &str) {
	match location.rsplit_once('#') {
		Some((path, extension)) if !path.is_empty() => (path, extension),
		_ => (location, DEFAULT_EXTENSION),
	}
}

/// Open the tile source at `location`.
#[context("opening tile source '{location}'")]
pub fn get_tile_source(location: &str) -> Result<Arc<dyn TileSource>> {
	if is_url(location) {
		return Ok(Arc::new(HttpTileSource::from_template(location)?));
	}

	let (path, extension) = split_extension(location);
	log::debug!("reading {extension} tiles from directory {path:?}");
	Ok(Arc::new(DirectoryTileSource::new(Path::new(path), extension)?))
}
