//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Web Mercator slippy map grid

use std::f64::consts;

/// Highest zoom level with tile indices representable as `u32`
pub const MAX_ZOOM: u8 = 30;

/// Latitude limit of the Web Mercator projection (atan(sinh(π)) in degrees)
pub const MAX_LATITUDE: f64 = 85.0511287798066;

/// Geographic extent in decimal degrees
#[derive(PartialEq, Clone, Debug)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

/// Min and max tile numbers, both inclusive
#[derive(PartialEq, Clone, Debug)]
pub struct ExtentInt {
    pub minx: u32,
    pub miny: u32,
    pub maxx: u32,
    pub maxy: u32,
}

impl ExtentInt {
    /// Limits of an inverted extent (min > max) contain no tiles
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx || self.miny > self.maxy
    }
    /// Number of tiles within the limits
    pub fn num_tiles(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        (self.maxx as u64 - self.minx as u64 + 1) * (self.maxy as u64 - self.miny as u64 + 1)
    }
}

pub static WORLD_EXTENT: Extent = Extent {
    minx: -180.0,
    miny: -90.0,
    maxx: 180.0,
    maxy: 90.0,
};

/// Number of tiles per axis at `zoom`
pub fn tiles_per_axis(zoom: u8) -> u64 {
    1u64 << zoom
}

/// Tile index `(x, y)` containing the point at lon/lat, XYZ adressing scheme.
///
/// Latitude must be strictly within ±[`MAX_LATITUDE`], otherwise the result is meaningless.
/// No clamping is applied, values outside of `0..2^zoom` are returned as they are computed.
pub fn lonlat_to_tile(lon: f64, lat: f64, zoom: u8) -> (i64, i64) {
    let lat_rad = lat.to_radians();
    let n = tiles_per_axis(zoom) as f64;
    let x = ((lon + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / consts::PI) / 2.0 * n).floor();
    (x as i64, y as i64)
}

/// Lon/lat of the north-west corner of tile `(x, y)` in XYZ adressing scheme
pub fn tile_lonlat(xtile: u32, ytile: u32, zoom: u8) -> (f64, f64) {
    let n = tiles_per_axis(zoom) as f64;
    let lon = xtile as f64 / n * 360.0 - 180.0;
    let lat = (consts::PI * (1.0 - 2.0 * ytile as f64 / n)).sinh().atan();
    (lon, lat.to_degrees())
}

fn clamp_index(v: i64, zoom: u8) -> u32 {
    let max = tiles_per_axis(zoom) as i64 - 1;
    v.max(0).min(max) as u32
}

/// Tile index limits covering extent at zoom level
///
/// The south-west corner gives the minimum x and maximum y tile, the north-east corner the
/// maximum x and minimum y tile, since y grows southward.
/// Latitudes beyond the projection limits are clamped and the resulting limits
/// are restricted to the valid tile range of the level.
pub fn tile_limits(extent: &Extent, zoom: u8) -> ExtentInt {
    let south = extent.miny.max(-MAX_LATITUDE).min(MAX_LATITUDE);
    let north = extent.maxy.max(-MAX_LATITUDE).min(MAX_LATITUDE);
    let (x_min, y_max) = lonlat_to_tile(extent.minx, south, zoom);
    let (x_max, y_min) = lonlat_to_tile(extent.maxx, north, zoom);
    ExtentInt {
        minx: clamp_index(x_min, zoom),
        miny: clamp_index(y_min, zoom),
        maxx: clamp_index(x_max, zoom),
        maxy: clamp_index(y_max, zoom),
    }
}

/// Tile index limits for each zoom level
pub fn zoom_limits(extent: &Extent, zoomlevels: &[u8]) -> Vec<(u8, ExtentInt)> {
    zoomlevels
        .iter()
        .map(|&zoom| (zoom, tile_limits(extent, zoom)))
        .collect()
}
