//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Statistics collector for tile requests

use stats::{MinMax, OnlineStats};
use std::collections::BTreeMap;
use std::fmt;

type MeasurementType = u64;

struct Measurements {
    online: OnlineStats,
    minmax: MinMax<MeasurementType>,
}

#[derive(PartialEq, Debug)]
pub struct Summary {
    pub count: usize,
    pub min: MeasurementType,
    pub max: MeasurementType,
    pub mean: f64,
    pub stddev: f64,
}

/// Measurements grouped by key, e.g. `fetch_ms.osm.17`
#[derive(Default)]
pub struct Statistics(BTreeMap<String, Measurements>);

impl Statistics {
    pub fn new() -> Statistics {
        Statistics(BTreeMap::new())
    }
    pub fn add(&mut self, key: &str, value: MeasurementType) {
        let m = self.0.entry(key.to_string()).or_insert_with(|| Measurements {
            online: OnlineStats::new(),
            minmax: MinMax::new(),
        });
        m.online.add(value);
        m.minmax.add(value);
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
    /// Summary of the measurements of `key`. Unknown keys have a zero summary.
    pub fn summary(&self, key: &str) -> Summary {
        match self.0.get(key) {
            Some(m) => Summary {
                count: m.minmax.len(),
                min: *m.minmax.min().unwrap_or(&0),
                max: *m.minmax.max().unwrap_or(&0),
                mean: m.online.mean(),
                stddev: m.online.stddev(),
            },
            None => Summary {
                count: 0,
                min: 0,
                max: 0,
                mean: 0.0,
                stddev: 0.0,
            },
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "n={} min={} max={} mean={:.1} +/- {:.1}",
            self.count, self.min, self.max, self.mean, self.stddev
        )
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for key in self.0.keys() {
            writeln!(f, "{}: {}", key, self.summary(key))?;
        }
        Ok(())
    }
}

#[test]
fn test_summary() {
    let mut stats = Statistics::new();
    assert!(stats.is_empty());
    stats.add("fetch_ms.osm.17", 100);
    stats.add("fetch_ms.osm.17", 300);
    stats.add("tile_bytes.osm.17", 2048);
    stats.add("fetch_ms.osm.17", 200);

    let s = stats.summary("fetch_ms.osm.17");
    assert_eq!(s.count, 3);
    assert_eq!(s.min, 100);
    assert_eq!(s.max, 300);
    assert_eq!(s.mean, 200.0);
    assert_eq!(stats.summary("tile_bytes.osm.17").mean, 2048.0);

    assert_eq!(stats.summary("fetch_ms.osmfr-hot.17").count, 0);
    assert_eq!(
        stats.keys().collect::<Vec<_>>(),
        vec!["fetch_ms.osm.17", "tile_bytes.osm.17"]
    );
    assert_eq!(
        format!("{}", stats),
        "fetch_ms.osm.17: n=3 min=100 max=300 mean=200.0 +/- 81.6\n\
         tile_bytes.osm.17: n=1 min=2048 max=2048 mean=2048.0 +/- 0.0\n"
    );
}
