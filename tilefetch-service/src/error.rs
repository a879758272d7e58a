//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use thiserror::Error;

/// Failure of a single tile request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Timeout, connection refused, DNS failure, ...
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("error reading response: {0}")]
    Body(String),
    #[error("error writing tile: {0}")]
    Cache(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None if e.is_body() || e.is_decode() => FetchError::Body(e.to_string()),
            None => FetchError::Transport(e.to_string()),
        }
    }
}
