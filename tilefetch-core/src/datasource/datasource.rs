//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use tile_grid::Extent;

/// Provider of the area to fetch tiles for
pub trait ExtentSource {
    fn info(&self) -> String;
    /// Total bounds in decimal degrees (minlon, minlat, maxlon, maxlat)
    fn extent(&self) -> Result<Extent, String>;
}

/// Fixed extent, e.g. given on the command line
pub struct StaticExtent(pub Extent);

impl ExtentSource for StaticExtent {
    fn info(&self) -> String {
        format!(
            "Extent [{}, {}, {}, {}]",
            self.0.minx, self.0.miny, self.0.maxx, self.0.maxy
        )
    }
    fn extent(&self) -> Result<Extent, String> {
        Ok(self.0.clone())
    }
}

/// Parse an extent from a list `minx,miny,maxx,maxy`
pub fn parse_extent(numlist: &str) -> Result<Extent, String> {
    let arr = numlist
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| format!("Error parsing '{}' as list of float values", numlist))?;
    match arr.as_slice() {
        [minx, miny, maxx, maxy] => Ok(Extent {
            minx: *minx,
            miny: *miny,
            maxx: *maxx,
            maxy: *maxy,
        }),
        _ => Err(format!(
            "Extent '{}' must have 4 values minx,miny,maxx,maxy",
            numlist
        )),
    }
}

#[test]
fn test_parse_extent() {
    assert_eq!(
        parse_extent("8.53,47.36, 8.55,47.38"),
        Ok(Extent {
            minx: 8.53,
            miny: 47.36,
            maxx: 8.55,
            maxy: 47.38,
        })
    );
    assert!(parse_extent("8.53,47.36,8.55").is_err());
    assert_eq!(
        parse_extent("a,b,c,d").err(),
        Some("Error parsing 'a,b,c,d' as list of float values".to_string())
    );
    let ext = StaticExtent(parse_extent("-1,-2,3,4").unwrap());
    assert_eq!(ext.info(), "Extent [-1, -2, 3, 4]");
    assert_eq!(ext.extent().unwrap().maxy, 4.0);
}
