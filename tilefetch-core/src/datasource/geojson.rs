//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Total bounds of a GeoJSON file

use crate::datasource::ExtentSource;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use tile_grid::Extent;

pub struct GeojsonSource {
    pub path: String,
}

impl GeojsonSource {
    pub fn new(path: &str) -> GeojsonSource {
        GeojsonSource {
            path: path.to_string(),
        }
    }
}

impl ExtentSource for GeojsonSource {
    fn info(&self) -> String {
        format!("GeoJSON bounds of {}", self.path)
    }
    fn extent(&self) -> Result<Extent, String> {
        let file = File::open(&self.path)
            .map_err(|e| format!("Error opening '{}': {}", self.path, e))?;
        let json: Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format!("{} - {}", self.path, e))?;
        geojson_bounds(&json).ok_or(format!("{} - no coordinates found", self.path))
    }
}

#[derive(Default)]
struct Bounds(Option<Extent>);

impl Bounds {
    fn add_point(&mut self, x: f64, y: f64) {
        match self.0 {
            Some(ref mut ext) => {
                ext.minx = ext.minx.min(x);
                ext.miny = ext.miny.min(y);
                ext.maxx = ext.maxx.max(x);
                ext.maxy = ext.maxy.max(y);
            }
            None => {
                self.0 = Some(Extent {
                    minx: x,
                    miny: y,
                    maxx: x,
                    maxy: y,
                })
            }
        }
    }
    /// Nested coordinate arrays of any depth
    fn add_coordinates(&mut self, coords: &Value) {
        if let Some(arr) = coords.as_array() {
            match (arr.get(0).and_then(Value::as_f64), arr.get(1).and_then(Value::as_f64)) {
                (Some(x), Some(y)) => self.add_point(x, y),
                _ => {
                    for c in arr {
                        self.add_coordinates(c);
                    }
                }
            }
        }
    }
    fn add_object(&mut self, obj: &Value) {
        match obj.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {
                for feature in obj["features"].as_array().into_iter().flatten() {
                    self.add_object(feature);
                }
            }
            Some("Feature") => {
                if let Some(geom) = obj.get("geometry") {
                    self.add_object(geom);
                }
            }
            Some("GeometryCollection") => {
                for geom in obj["geometries"].as_array().into_iter().flatten() {
                    self.add_object(geom);
                }
            }
            Some(_) => {
                if let Some(coords) = obj.get("coordinates") {
                    self.add_coordinates(coords);
                }
            }
            None => {}
        }
    }
}

/// Explicit `bbox` member, 2D or 3D
fn bbox_member(json: &Value) -> Option<Extent> {
    let bbox = json
        .get("bbox")?
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<f64>>>()?;
    let dim = bbox.len() / 2;
    if bbox.len() % 2 != 0 || dim < 2 {
        return None;
    }
    Some(Extent {
        minx: bbox[0],
        miny: bbox[1],
        maxx: bbox[dim],
        maxy: bbox[dim + 1],
    })
}

/// Total bounds of all geometries in a GeoJSON object
pub fn geojson_bounds(json: &Value) -> Option<Extent> {
    if let Some(extent) = bbox_member(json) {
        return Some(extent);
    }
    let mut bounds = Bounds::default();
    bounds.add_object(json);
    bounds.0
}
