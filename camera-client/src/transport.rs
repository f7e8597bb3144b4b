//! Single round trips to the camera API.

#![deny(missing_docs)]

use crate::config::Config;
use crate::error::{Error, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// What gets sent along with a request. Settings and raw data are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Plain `GET` without a body.
    Empty,
    /// `GET` carrying the settings as JSON body (the camera does not read query parameters).
    Settings(serde_json::Value),
    /// `POST` of opaque data as `application/octet-stream`.
    Raw(Vec<u8>),
}

/// A completed round trip, regardless of the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    content: Vec<u8>,
}

impl ApiResponse {
    /// Wrap an already received response.
    pub fn new(status: u16, content: Vec<u8>) -> Self {
        Self { status, content }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The raw body.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Take the raw body.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.content)?)
    }

    /// Turn anything but `200 OK` into [`Error::Protocol`].
    pub fn require_ok(self) -> Result<Self> {
        if self.status == 200 {
            Ok(self)
        } else {
            Err(Error::Protocol {
                status: self.status,
                content: self.content,
            })
        }
    }
}

/// Build `http://<ip>/api/v1/<segments...>?key=<key>`.
///
/// Segments are percent-encoded, so arbitrary file names can be used as the last segment.
pub fn endpoint_url(config: &Config, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(&format!("http://{}/api/v1/", config.ip_address))?;
    url.path_segments_mut()
        .map_err(|_| Error::InvalidAddress(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    url.query_pairs_mut().append_pair("key", &config.key);
    Ok(url)
}

/// Build the blocking client shared by all calls of one camera.
///
/// Idle connections are not kept, every call opens and closes its own connection.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder().pool_max_idle_per_host(0).build()?)
}

/// Issue exactly one request and wait at most `timeout` for the complete response.
///
/// Only failures to get a response at all are returned as errors, the status code is left to the caller.
pub fn api_call(
    client: &Client,
    url: Url,
    body: RequestBody,
    timeout: Duration,
) -> Result<ApiResponse> {
    let path = url.path().to_string();
    let request = match body {
        RequestBody::Empty => {
            debug!("GET {}", path);
            client.get(url)
        }
        RequestBody::Settings(settings) => {
            debug!("GET {} with settings {}", path, settings);
            client.get(url).json(&settings)
        }
        RequestBody::Raw(data) => {
            // we don't know what kind of file it is
            debug!("POST {} ({} bytes)", path, data.len());
            client
                .post(url)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(data)
        }
    };

    let result = request.timeout(timeout).send().and_then(|response| {
        let status = response.status();
        response.bytes().map(|content| (status, content))
    });

    match result {
        Ok((status, content)) => {
            if !status.is_success() {
                debug!("{} answered with {}", path, status);
            }
            Ok(ApiResponse::new(status.as_u16(), content.to_vec()))
        }
        Err(e) => {
            debug!("request to {} failed: {}", path, e);
            Err(e.into())
        }
    }
}
