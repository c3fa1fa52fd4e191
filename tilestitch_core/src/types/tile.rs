//! What a tile source hands back for one address.

use crate::Blob;
use std::collections::BTreeMap;

/// Response headers reported by a tile source, with case-insensitive names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileHeaders(BTreeMap<String, String>);

impl TileHeaders {
	#[must_use]
	pub fn new() -> TileHeaders {
		TileHeaders::default()
	}

	/// Set a header, replacing an existing value with the same (case-insensitive) name.
	pub fn insert(&mut self, name: &str, value: impl Into<String>) {
		self.0.insert(name.to_ascii_lowercase(), value.into());
	}

	/// Builder variant of [`insert`](Self::insert).
	#[must_use]
	pub fn with(mut self, name: &str, value: impl Into<String>) -> TileHeaders {
		self.insert(name, value);
		self
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	#[must_use]
	pub fn last_modified(&self) -> Option<&str> {
		self.get("last-modified")
	}

	#[must_use]
	pub fn etag(&self) -> Option<&str> {
		self.get("etag")
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterate over `(lower-case name, value)` pairs.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for TileHeaders {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut headers = TileHeaders::new();
		for (name, value) in iter {
			headers.insert(name.as_ref(), value);
		}
		headers
	}
}

/// Per-tile performance record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileStats {
	/// Time the source spent producing the tile, in milliseconds.
	pub render: Option<u64>,
}

impl TileStats {
	#[must_use]
	pub fn with_render(render: u64) -> TileStats {
		TileStats { render: Some(render) }
	}
}

/// An encoded tile plus the metadata its source reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchedTile {
	pub blob: Blob,
	pub headers: Option<TileHeaders>,
	pub stats: TileStats,
}

impl FetchedTile {
	/// A tile without headers or stats.
	#[must_use]
	pub fn new(blob: Blob) -> FetchedTile {
		FetchedTile {
			blob,
			headers: None,
			stats: TileStats::default(),
		}
	}

	#[must_use]
	pub fn with_headers(mut self, headers: TileHeaders) -> FetchedTile {
		self.headers = Some(headers);
		self
	}

	#[must_use]
	pub fn with_stats(mut self, stats: TileStats) -> FetchedTile {
		self.stats = stats;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn headers_are_case_insensitive() {
		let mut headers = TileHeaders::new().with("Last-Modified", "Sun, 23 Feb 2014 18:00:00 GMT");
		headers.insert("ETAG", "\"abc\"");
		assert_eq!(headers.last_modified(), Some("Sun, 23 Feb 2014 18:00:00 GMT"));
		assert_eq!(headers.etag(), Some("\"abc\""));
		assert_eq!(headers.get("etag"), Some("\"abc\""));
		headers.insert("etag", "\"def\"");
		assert_eq!(headers.iter().count(), 2);
		assert_eq!(headers.etag(), Some("\"def\""));
	}

	#[test]
	fn headers_from_iter() {
		let headers: TileHeaders = [("Content-Type", "image/png")].into_iter().collect();
		assert_eq!(headers.get("content-type"), Some("image/png"));
		assert!(!headers.is_empty());
		assert!(TileHeaders::new().is_empty());
	}

	#[test]
	fn fetched_tile_builders() {
		let tile = FetchedTile::new(Blob::from("png"))
			.with_stats(TileStats::with_render(12))
			.with_headers(TileHeaders::new().with("etag", "x"));
		assert_eq!(tile.stats.render, Some(12));
		assert_eq!(tile.headers.unwrap().etag(), Some("x"));
	}
}
