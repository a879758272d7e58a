//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod datasource;
pub mod geojson;

pub use self::datasource::{parse_extent, ExtentSource, StaticExtent};
pub use self::geojson::GeojsonSource;
