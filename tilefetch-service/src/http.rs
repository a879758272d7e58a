//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! HTTP transport

use crate::error::FetchError;
use reqwest::blocking::ClientBuilder;
use reqwest::StatusCode;
use std::time::Duration;

/// Blocking HTTP GET returning the body of a successful response.
///
/// Any status other than 200 OK is an error.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP client with fixed timeout and User-Agent
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, String> {
        Self::with_builder(reqwest::blocking::Client::builder(), timeout, user_agent)
    }
    pub(crate) fn with_builder(
        builder: ClientBuilder,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, String> {
        let client = builder
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
        Ok(ReqwestClient { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send()?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let body = response
            .bytes()
            .map_err(|e| FetchError::Body(e.to_string()))?;
        Ok(body.to_vec())
    }
}
