//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;

pub mod error;
pub mod fetch_service;
#[cfg(test)]
mod fetch_service_test;
pub mod http;
pub mod manifest;
pub mod sources;

pub use error::FetchError;
pub use fetch_service::{FetchService, GenerateSummary, TileOutcome};
pub use manifest::Manifest;
