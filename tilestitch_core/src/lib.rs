//! The tiling engine of tilestitch: projection, extent resolution, tile grid planning and the
//! concurrent fetch-and-composite orchestrator.
//!
//! ```
//! use std::sync::Arc;
//! use futures::FutureExt;
//! use tilestitch_core::{Blob, FetchedTile, GeoBBox, StitchOptions, TileSourceFn};
//!
//! let options = StitchOptions {
//!     zoom: 5,
//!     ..StitchOptions::default()
//! }
//! .with_bbox(GeoBBox::new(-60.0, -60.0, 60.0, 60.0))
//! .with_tile_source(Arc::new(TileSourceFn::new("blank", |_| {
//!     async { Ok(FetchedTile::new(Blob::from("tile"))) }.boxed()
//! })));
//!
//! let (dimensions, plan) = options.resolve().unwrap().plan().unwrap();
//! assert_eq!((dimensions.width, dimensions.height), (2730, 3434));
//! assert_eq!(plan.len(), 168);
//! ```

pub mod capabilities;
pub use capabilities::*;

pub mod error;
pub use error::*;

pub mod grid;
pub use grid::*;

pub mod headers;
pub use headers::*;

pub mod options;
pub use options::*;

pub mod projection;
pub use projection::*;

pub mod resolve;
pub use resolve::*;

pub mod stitch;
pub use stitch::*;

pub mod types;
pub use types::*;
