//! # tilestitch
//!
//! Stitches slippy-map tiles covering a bounding box or a center point into one image.
//!
//! This crate holds the pieces the `tilestitch` binary is built from: YAML request files and the
//! tile sources it can open (URL templates and `{z}/{x}/{y}` directories). The tiling engine
//! lives in [`core`], the raster compositor in [`image`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use tilestitch::{core::{GeoBBox, StitchOptions, stitch}, image::ImageCompositor, sources::get_tile_source};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let options = StitchOptions {
//!     zoom: 12,
//!     scale: 2.0,
//!     ..StitchOptions::default()
//! }
//! .with_bbox(GeoBBox::new(13.08, 52.33, 13.76, 52.67))
//! .with_tile_source(get_tile_source("https://tiles.example.org/{z}/{x}/{y}.png")?);
//!
//! let result = stitch(&options, Arc::new(ImageCompositor::new())).await?;
//! std::fs::write("berlin.png", result.image.as_slice())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod sources;

pub use tilestitch_core as core;
pub use tilestitch_image as image;
