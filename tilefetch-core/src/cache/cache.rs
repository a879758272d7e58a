//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use std::io;

pub trait Cache {
    fn info(&self) -> String;
    /// Relative cache path of tile `z/x/y`
    fn tile_path(&self, zoom: u8, xtile: u32, ytile: u32) -> String;
    fn write(&self, path: &str, obj: &[u8]) -> Result<(), io::Error>;
    /// Cache hit check. A hit is never revalidated.
    fn exists(&self, path: &str) -> bool;
}
