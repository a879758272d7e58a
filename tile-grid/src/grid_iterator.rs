//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Grid iterators

use crate::grid::ExtentInt;

/// Level-by-level iterator over inclusive tile limits
pub struct GridIterator {
    level: usize,
    x: u32,
    y: u32,
    levels: Vec<(u8, ExtentInt)>,
    finished: bool,
}

impl GridIterator {
    pub fn new(levels: Vec<(u8, ExtentInt)>) -> GridIterator {
        let levels: Vec<_> = levels
            .into_iter()
            .filter(|(_, limit)| !limit.is_empty())
            .collect();
        match levels.first() {
            Some((_, limit)) => GridIterator {
                level: 0,
                x: limit.minx,
                y: limit.miny,
                finished: false,
                levels,
            },
            // Return "empty" iterator when there is nothing to visit
            None => GridIterator {
                level: 0,
                x: 0,
                y: 0,
                levels,
                finished: true,
            },
        }
    }
}

impl Iterator for GridIterator {
    /// Current cell index `(z, x, y)`
    type Item = (u8, u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let (zoom, ref limit) = self.levels[self.level];
        let current = (zoom, self.x, self.y);
        if self.y < limit.maxy {
            self.y += 1;
        } else if self.x < limit.maxx {
            self.x += 1;
            self.y = limit.miny;
        } else if self.level + 1 < self.levels.len() {
            self.level += 1;
            let (_, ref limit) = self.levels[self.level];
            self.x = limit.minx;
            self.y = limit.miny;
        } else {
            self.finished = true;
        }
        Some(current)
    }
}

#[test]
fn test_level_iter() {
    let levels = vec![
        (
            1,
            ExtentInt {
                minx: 0,
                miny: 0,
                maxx: 1,
                maxy: 1,
            },
        ),
        (
            3,
            ExtentInt {
                minx: 4,
                miny: 2,
                maxx: 5,
                maxy: 4,
            },
        ),
    ];
    let cells = GridIterator::new(levels).collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![
            (1, 0, 0),
            (1, 0, 1),
            (1, 1, 0),
            (1, 1, 1),
            (3, 4, 2),
            (3, 4, 3),
            (3, 4, 4),
            (3, 5, 2),
            (3, 5, 3),
            (3, 5, 4),
        ]
    );

    let single = vec![(
        18,
        ExtentInt {
            minx: 131072,
            miny: 131072,
            maxx: 131072,
            maxy: 131072,
        },
    )];
    let cells = GridIterator::new(single).collect::<Vec<_>>();
    assert_eq!(cells, vec![(18, 131072, 131072)]);
}

#[test]
fn test_bad_params() {
    // no levels
    let cells = GridIterator::new(Vec::new()).collect::<Vec<_>>();
    assert_eq!(cells, vec![]);

    // inverted limits are skipped
    let levels = vec![
        (
            2,
            ExtentInt {
                minx: 3,
                miny: 0,
                maxx: 1,
                maxy: 0,
            },
        ),
        (
            4,
            ExtentInt {
                minx: 7,
                miny: 9,
                maxx: 7,
                maxy: 9,
            },
        ),
    ];
    let cells = GridIterator::new(levels).collect::<Vec<_>>();
    assert_eq!(cells, vec![(4, 7, 9)]);
}
