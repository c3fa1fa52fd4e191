//! Contains the value types of a stitch request: coordinates, sizes, tile addresses and tile payloads.

mod blob;
pub use blob::*;

mod geo;
pub use geo::*;

mod output_format;
pub use output_format::*;

mod pixel;
pub use pixel::*;

mod tile;
pub use tile::*;

mod tile_address;
pub use tile_address::*;
