//! A library for slippy map tile index calculations
//!
//! ## Tile index of a point
//!
//! ```rust
//! use tile_grid::lonlat_to_tile;
//!
//! assert_eq!(lonlat_to_tile(0.0, 0.0, 18), (131072, 131072));
//! ```
//!
//! ## Grid iterators
//!
//! ```rust
//! use tile_grid::{zoom_limits, Extent, GridIterator};
//!
//! let extent = Extent {
//!     minx: 8.5,
//!     miny: 47.3,
//!     maxx: 8.6,
//!     maxy: 47.4,
//! };
//! let griditer = GridIterator::new(zoom_limits(&extent, &[12, 13]));
//! for (z, x, y) in griditer {
//!     println!("Tile {}/{}/{}", z, x, y);
//! }
//! ```

mod grid;
mod grid_iterator;

pub use grid::{
    lonlat_to_tile, tile_limits, tile_lonlat, tiles_per_axis, zoom_limits, Extent, ExtentInt,
    MAX_LATITUDE, MAX_ZOOM, WORLD_EXTENT,
};
pub use grid_iterator::GridIterator;
