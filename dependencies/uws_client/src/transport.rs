//
// (C) Copyright IBM 2025
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

//! HTTP plumbing for UWS requests

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use log::{debug, error};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{redirect, StatusCode};
use reqwest_middleware::{ClientBuilder as ReqwestClientBuilder, ClientWithMiddleware};
use std::time::Duration;

use crate::error::{Result, UwsError};
use crate::models::JobParameters;

/// Body of a result download, chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

const XML_CONTENT: &str = "application/xml";

/// Overall limit for a single request, download bodies included, unless the
/// caller configures another one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Authenticated request layer underneath [`Client`](crate::Client).
///
/// Implementations never retry. Any status other than the expected one is
/// returned as [`UwsError::RequestFailed`] with the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts `params` form-encoded to the jobs collection at `url` and returns
    /// the job id taken from the `303 See Other` acknowledgment.
    async fn submit(&self, url: &str, params: &JobParameters) -> Result<String>;

    /// Gets a UWS document, expecting `200 OK`.
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Starts a result download, expecting `200 OK`. The body is not read
    /// until the returned stream is polled.
    async fn open_download(&self, url: &str) -> Result<ByteStream>;
}

/// Extracts the job id from the `Location` of a job creation response: the
/// last path segment.
pub fn job_id_from_location(location: &str) -> Option<String> {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// [`Transport`] over HTTP(S) with a bearer token.
///
/// The underlying connection pools are owned by this value and closed when it
/// is dropped.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Follows redirects; used for status and result requests
    client: ClientWithMiddleware,
    /// Never follows redirects, so the 303 of job creation stays visible
    submit_client: ClientWithMiddleware,
}

impl HttpTransport {
    /// Transport with [`DEFAULT_REQUEST_TIMEOUT`] and no separate connect
    /// timeout.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_timeouts(token, Some(DEFAULT_REQUEST_TIMEOUT), None)
    }

    /// `None` leaves the corresponding timeout unlimited.
    pub fn with_timeouts(
        token: &str,
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| UwsError::InvalidConfig(format!("invalid token: {e}")))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let build = |policy: redirect::Policy| -> Result<ClientWithMiddleware> {
            let mut reqwest_client_builder = reqwest::Client::builder()
                .connection_verbose(true)
                .default_headers(headers.clone())
                .redirect(policy);
            if let Some(v) = timeout {
                reqwest_client_builder = reqwest_client_builder.timeout(v)
            }
            if let Some(v) = connect_timeout {
                reqwest_client_builder = reqwest_client_builder.connect_timeout(v)
            }
            let reqwest_client = reqwest_client_builder
                .build()
                .map_err(|e| UwsError::InvalidConfig(e.to_string()))?;
            Ok(ReqwestClientBuilder::new(reqwest_client).build())
        };

        Ok(Self {
            client: build(redirect::Policy::default())?,
            submit_client: build(redirect::Policy::none())?,
        })
    }

    async fn failure(url: &str, resp: reqwest::Response) -> UwsError {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());
        error!("Request to {} failed: {} {}", url, status, body);
        UwsError::RequestFailed {
            url: url.to_string(),
            status,
            body,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, url: &str, params: &JobParameters) -> Result<String> {
        debug!("POST {} {:?}", url, params);
        let resp = self
            .submit_client
            .post(url)
            .header(header::ACCEPT, XML_CONTENT)
            .form(params)
            .send()
            .await?;
        if resp.status() != StatusCode::SEE_OTHER {
            return Err(Self::failure(url, resp).await);
        }
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!("Job created at {:?}", location);
        location
            .as_deref()
            .and_then(job_id_from_location)
            .ok_or(UwsError::MissingJobId { location })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, XML_CONTENT)
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(Self::failure(url, resp).await);
        }
        let text = resp.text().await?;
        debug!("{}", text);
        Ok(text)
    }

    async fn open_download(&self, url: &str) -> Result<ByteStream> {
        debug!("GET {} (download)", url);
        let resp = self.client.get(url).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(Self::failure(url, resp).await);
        }
        Ok(resp.bytes_stream().map_err(UwsError::from).boxed())
    }
}
