//! YAML request files for the `render` command.
//!
//! ```yaml
//! source: tiles/osm#png
//! output: berlin.png
//! options:
//!   zoom: 12
//!   scale: 2
//!   bbox: [13.08, 52.33, 13.76, 52.67]
//! ```
//!
//! Relative `source` directories and `output` paths are resolved against the directory of the
//! request file.

use crate::sources::is_url;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};
use tilestitch_core::StitchOptions;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestConfig {
	/// URL template or tile directory.
	pub source: Option<String>,

	/// Where to write the stitched image.
	pub output: Option<PathBuf>,

	/// Stitch options; the tile source is opened from `source`.
	pub options: StitchOptions,
}

impl RequestConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parse a request file and resolve its relative paths against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening request file {path:?}"))?;
		let mut config =
			RequestConfig::from_reader(BufReader::new(file)).with_context(|| format!("parsing request file {path:?}"))?;

		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		Ok(config)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		if let Some(source) = &self.source
			&& !is_url(source)
			&& Path::new(source).is_relative()
		{
			self.source = Some(base.join(source).to_string_lossy().into_owned());
		}

		if let Some(output) = &self.output
			&& output.is_relative()
		{
			self.output = Some(base.join(output));
		}
	}
}
