//! Cache headers of a stitched image, derived from the headers of its tiles.
//!
//! * `Cache-Control` is fixed to one hour.
//! * `Content-Type` and `Content-Encoding` follow the output format.
//! * `Last-Modified` is the newest tile timestamp. Tiles without a timestamp count as
//!   [`LAST_MODIFIED_ANCHOR`] as long as at least one tile has a real one; if none has, the
//!   current time is used.
//! * `ETag` is the single tile ETag verbatim, or a SHA-256 hex digest of all ETags joined by
//!   commas, or of the `Last-Modified` value when no tile has an ETag.

use crate::{OutputFormat, TileHeaders};
use sha2::{Digest, Sha256};
use time::{
	OffsetDateTime, PrimitiveDateTime, UtcOffset,
	format_description::{
		BorrowedFormatItem,
		well_known::{Rfc2822, Rfc3339},
	},
	macros::{datetime, format_description},
};

/// Stand-in timestamp for tiles that report no `Last-Modified` header.
pub const LAST_MODIFIED_ANCHOR: OffsetDateTime = datetime!(2014-02-23 18:00:00 UTC);

/// Value of the `Cache-Control` header of every stitched image.
pub const CACHE_CONTROL: &str = "max-age=3600";

/// HTTP date format, e.g. `Sun, 23 Feb 2014 18:00:00 GMT`.
const IMF_FIXDATE: &[BorrowedFormatItem<'static>] =
	format_description!("[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT");

/// Headers of a stitched image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StitchHeaders {
	pub cache_control: String,
	pub content_type: String,
	pub content_encoding: Option<String>,
	pub last_modified: String,
	pub etag: String,
}

impl StitchHeaders {
	/// Iterate over `(name, value)` pairs in canonical capitalization.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
		[
			("Cache-Control", Some(self.cache_control.as_str())),
			("Content-Type", Some(self.content_type.as_str())),
			("Content-Encoding", self.content_encoding.as_deref()),
			("Last-Modified", Some(self.last_modified.as_str())),
			("ETag", Some(self.etag.as_str())),
		]
		.into_iter()
		.filter_map(|(name, value)| value.map(|value| (name, value)))
	}
}

/// Merge the headers of all tiles of one stitch, in plan order.
///
/// A `None` entry is a tile whose source reported no headers at all.
#[must_use]
pub fn merge_headers(tile_headers: &[Option<TileHeaders>], format: OutputFormat, now: OffsetDateTime) -> StitchHeaders {
	let last_modified = format_http_date(merge_last_modified(tile_headers, now));

	let etags: Vec<&str> = tile_headers
		.iter()
		.filter_map(|headers| headers.as_ref()?.etag())
		.collect();
	let etag = match etags.as_slice() {
		[] => hex_digest(&last_modified),
		[etag] => (*etag).to_string(),
		etags => hex_digest(&etags.join(",")),
	};

	StitchHeaders {
		cache_control: CACHE_CONTROL.to_string(),
		content_type: format.content_type().to_string(),
		content_encoding: format.content_encoding().map(str::to_string),
		last_modified,
		etag,
	}
}

fn merge_last_modified(tile_headers: &[Option<TileHeaders>], now: OffsetDateTime) -> OffsetDateTime {
	let timestamps: Vec<Option<OffsetDateTime>> = tile_headers
		.iter()
		.map(|headers| headers.as_ref()?.last_modified().and_then(parse_timestamp))
		.collect();

	let newest = timestamps.iter().flatten().max().copied();
	match newest {
		None => now,
		Some(newest) if timestamps.iter().any(Option::is_none) => newest.max(LAST_MODIFIED_ANCHOR),
		Some(newest) => newest,
	}
}

/// Parse an HTTP date (IMF-fixdate), an RFC 2822 date or an RFC 3339 timestamp.
fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
	let parsed = PrimitiveDateTime::parse(value, IMF_FIXDATE)
		.map(PrimitiveDateTime::assume_utc)
		.or_else(|_| OffsetDateTime::parse(value, &Rfc2822))
		.or_else(|_| OffsetDateTime::parse(value, &Rfc3339));
	match parsed {
		Ok(timestamp) => Some(timestamp),
		Err(error) => {
			log::warn!("ignoring unparseable Last-Modified header '{value}': {error}");
			None
		}
	}
}

/// Format a timestamp as an HTTP date in GMT.
#[must_use]
pub fn format_http_date(timestamp: OffsetDateTime) -> String {
	timestamp
		.to_offset(UtcOffset::UTC)
		.format(IMF_FIXDATE)
		.unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}

fn hex_digest(value: &str) -> String {
	format!("{:x}", Sha256::digest(value.as_bytes()))
}
