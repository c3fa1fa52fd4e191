//! The two injected capabilities of a stitch request.
//!
//! * [`TileSource`] produces the encoded bytes of one tile.
//! * [`Compositor`] turns positioned tiles into one encoded image.
//!
//! Both are object-safe so they can be passed around as `Arc<dyn …>`.

use crate::{Blob, FetchedTile, OutputFormat, TileAddress};
use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt::{self, Debug};

/// Anything that can fetch a tile by address.
///
/// A stitch may request the same address several times (wrapped columns, clamped rows), so
/// implementations must tolerate repeated requests. Retrying is the source's own business;
/// the orchestrator never retries.
#[async_trait]
pub trait TileSource: Debug + Send + Sync {
	/// Fetch the tile at `address`.
	async fn get_tile(&self, address: TileAddress) -> Result<FetchedTile>;
}

type TileSourceCallback = dyn Fn(TileAddress) -> BoxFuture<'static, Result<FetchedTile>> + Send + Sync;

/// Adapts an async closure into a [`TileSource`].
///
/// ```
/// use futures::FutureExt;
/// use tilestitch_core::{Blob, FetchedTile, TileAddress, TileSource, TileSourceFn};
///
/// # async fn example() -> anyhow::Result<()> {
/// let source = TileSourceFn::new("constant", |address: TileAddress| {
///     async move { Ok(FetchedTile::new(Blob::from(address.to_string().as_str()))) }.boxed()
/// });
/// let tile = source.get_tile(TileAddress::new(1, 0, 1)?).await?;
/// assert_eq!(tile.blob.as_slice(), b"1/0/1");
/// # Ok(())
/// # }
/// ```
pub struct TileSourceFn {
	name: String,
	callback: Box<TileSourceCallback>,
}

impl TileSourceFn {
	pub fn new<F>(name: &str, callback: F) -> TileSourceFn
	where
		F: Fn(TileAddress) -> BoxFuture<'static, Result<FetchedTile>> + Send + Sync + 'static,
	{
		TileSourceFn {
			name: name.to_string(),
			callback: Box::new(callback),
		}
	}
}

impl Debug for TileSourceFn {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TileSourceFn").field("name", &self.name).finish()
	}
}

#[async_trait]
impl TileSource for TileSourceFn {
	async fn get_tile(&self, address: TileAddress) -> Result<FetchedTile> {
		(self.callback)(address).await
	}
}

/// An encoded tile and the canvas position of its top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedTile {
	pub blob: Blob,
	pub x: i64,
	pub y: i64,
}

/// What the compositor has to produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeTarget {
	pub width: u32,
	pub height: u32,
	pub format: OutputFormat,
	pub quality: Option<u8>,
	/// Decode and re-encode even when a single tile could be passed through untouched.
	pub reencode: bool,
}

/// Decodes positioned tiles, crops them against the canvas, alpha-composites them in list
/// order and encodes the result once.
#[async_trait]
pub trait Compositor: Debug + Send + Sync {
	async fn compose(&self, tiles: Vec<PositionedTile>, target: CompositeTarget) -> Result<Blob>;
}
