//! Output formats of a composite image.

use crate::config_bail;
use anyhow::Result;
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// The encoding of the stitched image.
///
/// `VectorPbf` exists for header derivation (`application/x-protobuf`); raster compositors
/// reject it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum OutputFormat {
	#[default]
	Png,
	Jpeg,
	Webp,
	VectorPbf,
}

impl OutputFormat {
	/// The `Content-Type` of an image in this format.
	#[must_use]
	pub fn content_type(&self) -> &'static str {
		match self {
			OutputFormat::Png => "image/png",
			OutputFormat::Jpeg => "image/jpeg",
			OutputFormat::Webp => "image/webp",
			OutputFormat::VectorPbf => "application/x-protobuf",
		}
	}

	/// The `Content-Encoding` of an image in this format, if any.
	#[must_use]
	pub fn content_encoding(&self) -> Option<&'static str> {
		match self {
			OutputFormat::VectorPbf => Some("deflate"),
			_ => None,
		}
	}

	/// Conventional file extension.
	#[must_use]
	pub fn extension(&self) -> &'static str {
		match self {
			OutputFormat::Png => "png",
			OutputFormat::Jpeg => "jpg",
			OutputFormat::Webp => "webp",
			OutputFormat::VectorPbf => "pbf",
		}
	}
}

impl FromStr for OutputFormat {
	type Err = anyhow::Error;

	fn from_str(value: &str) -> Result<Self> {
		Ok(match value.trim().to_lowercase().as_str() {
			"png" => OutputFormat::Png,
			"jpg" | "jpeg" => OutputFormat::Jpeg,
			"webp" => OutputFormat::Webp,
			"pbf" | "vector.pbf" => OutputFormat::VectorPbf,
			_ => config_bail!("unknown output format '{value}', expected png, jpeg, webp or vector.pbf"),
		})
	}
}

impl TryFrom<String> for OutputFormat {
	type Error = anyhow::Error;

	fn try_from(value: String) -> Result<Self> {
		value.parse()
	}
}

impl fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			OutputFormat::Png => "png",
			OutputFormat::Jpeg => "jpeg",
			OutputFormat::Webp => "webp",
			OutputFormat::VectorPbf => "vector.pbf",
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("png", OutputFormat::Png)]
	#[case("PNG", OutputFormat::Png)]
	#[case("jpg", OutputFormat::Jpeg)]
	#[case("jpeg", OutputFormat::Jpeg)]
	#[case("webp", OutputFormat::Webp)]
	#[case("vector.pbf", OutputFormat::VectorPbf)]
	#[case("pbf", OutputFormat::VectorPbf)]
	fn parse(#[case] input: &str, #[case] expected: OutputFormat) {
		assert_eq!(input.parse::<OutputFormat>().unwrap(), expected);
	}

	#[test]
	fn parse_unknown() {
		assert_eq!(
			"tiff".parse::<OutputFormat>().unwrap_err().to_string(),
			"invalid configuration: unknown output format 'tiff', expected png, jpeg, webp or vector.pbf"
		);
	}

	#[test]
	fn headers() {
		assert_eq!(OutputFormat::default(), OutputFormat::Png);
		assert_eq!(OutputFormat::Jpeg.content_type(), "image/jpeg");
		assert_eq!(OutputFormat::Png.content_encoding(), None);
		assert_eq!(OutputFormat::VectorPbf.content_type(), "application/x-protobuf");
		assert_eq!(OutputFormat::VectorPbf.content_encoding(), Some("deflate"));
		assert_eq!(OutputFormat::VectorPbf.to_string(), "vector.pbf");
	}
}
