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

//! UWS job lifecycle client

use futures::StreamExt;
use log::{debug, error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::time::Instant;

use crate::endpoint::JobEndpointProvider;
use crate::error::{ParseError, Result, UwsError};
use crate::models::{Job, JobParameters, ResultRef};
use crate::parser::parse_job;
use crate::transport::{HttpTransport, Transport, DEFAULT_REQUEST_TIMEOUT};

/// Size of the write buffer used while saving a result.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// An asynchronous UWS `Client`.
///
/// Each job operation is a sequence of independent requests; the client holds
/// no per-job state and can drive several jobs concurrently from separate
/// tasks.
pub struct Client<T = HttpTransport> {
    pub(crate) endpoint: Arc<dyn JobEndpointProvider>,
    pub(crate) transport: T,
}

impl<T: Clone> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: Arc::clone(&self.endpoint),
            transport: self.transport.clone(),
        }
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("jobs_url", &self.endpoint.jobs_url())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Client<T> {
    /// Constructs a client over any [`Transport`].
    pub fn with_transport(endpoint: impl JobEndpointProvider + 'static, transport: T) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
            transport,
        }
    }

    pub fn jobs_url(&self) -> String {
        self.endpoint.jobs_url()
    }

    /// Creates a new job and returns its server-assigned id.
    ///
    /// `run_id` is sent as `runid`; `auto_start` adds `phase=RUN` so the job
    /// is queued immediately.
    ///
    /// # Errors
    ///
    /// - [`UwsError::RequestFailed`] when the server does not answer `303`.
    /// - [`UwsError::MissingJobId`] when the `Location` header has no job id.
    pub async fn create_job(
        &self,
        mut params: JobParameters,
        run_id: Option<&str>,
        auto_start: bool,
    ) -> Result<String> {
        if let Some(run_id) = run_id.filter(|v| !v.is_empty()) {
            params.set("runid", run_id);
        }
        if auto_start {
            params.set("phase", "RUN");
        }
        let url = self.endpoint.jobs_url();
        debug!("Submitting job with parameters: {:?}", params);
        let job_id = self.transport.submit(&url, &params).await?;
        debug!("Job created with ID: {}", job_id);
        Ok(job_id)
    }

    /// Fetches the current status of a job.
    ///
    /// # Errors
    ///
    /// - [`UwsError::RequestFailed`] when the server does not answer `200`.
    /// - [`UwsError::ParseFailed`] when the body is not a UWS job document or
    ///   describes a different job.
    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        let body = self.transport.fetch(&self.endpoint.job_url(job_id)).await?;
        let job = parse_job(&body)?;
        if let Some(reported) = job.job_id.as_deref().filter(|id| *id != job_id) {
            warn!("Status of job {} reports job id {}", job_id, reported);
            return Err(ParseError::JobIdMismatch {
                expected: job_id.to_string(),
                reported: reported.to_string(),
            }
            .into());
        }
        Ok(job)
    }

    /// Fetches the result references currently listed for a job.
    pub async fn get_job_results(&self, job_id: &str) -> Result<Vec<ResultRef>> {
        Ok(self.get_job(job_id).await?.results)
    }

    /// Polls the job every `poll_interval` until it reaches a terminal phase.
    ///
    /// ERROR and ABORTED are returned as a status like COMPLETED; deciding
    /// whether they are failures is left to the caller. The interval is
    /// constant and a failed poll is not retried. A status request still in
    /// flight when the deadline passes is abandoned.
    ///
    /// # Errors
    ///
    /// - [`UwsError::DeadlineExceeded`] once more than `timeout` has elapsed
    ///   since the first poll without a terminal phase.
    /// - any error of [`Client::get_job`], unchanged.
    pub async fn wait_for_job(
        &self,
        job_id: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Job> {
        if poll_interval.is_zero() {
            return Err(UwsError::InvalidRequest(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        let deadline_exceeded = || UwsError::DeadlineExceeded {
            job_id: job_id.to_string(),
            timeout,
        };
        let start = Instant::now();
        // No deadline when `timeout` is too large to be represented.
        let deadline = start.checked_add(timeout);
        loop {
            let job = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, self.get_job(job_id))
                    .await
                    .map_err(|_| {
                        error!("Status request for job {} outlived the deadline", job_id);
                        deadline_exceeded()
                    })??,
                None => self.get_job(job_id).await?,
            };
            info!("Job {} phase: {}", job_id, job.phase);
            if job.phase.is_terminal() {
                return Ok(job);
            }
            if start.elapsed() > timeout {
                return Err(deadline_exceeded());
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Streams a result to `output_path`, creating missing parent
    /// directories, and returns the absolute path written.
    ///
    /// Nothing is created on disk when the server refuses the download. A
    /// failure while the body is streaming leaves the partial file in place.
    ///
    /// # Errors
    ///
    /// - [`UwsError::RequestFailed`] when the server does not answer `200`.
    /// - [`UwsError::IoFailure`] when the file cannot be created or written.
    pub async fn download_result(
        &self,
        result_href: &str,
        output_path: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let path = std::path::absolute(output_path.as_ref())
            .map_err(|e| UwsError::io(output_path.as_ref(), e))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| UwsError::io(parent, e))?;
        }

        let mut body = self.transport.open_download(result_href).await?;
        info!("Downloading result to: {}", path.display());

        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| UwsError::io(&path, e))?;
        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| UwsError::io(&path, e))?;
            written += chunk.len() as u64;
        }
        writer.flush().await.map_err(|e| UwsError::io(&path, e))?;

        info!(
            "Successfully downloaded {} bytes to: {}",
            written,
            path.display()
        );
        Ok(path)
    }
}

/// A [`ClientBuilder`] can be used to create a [`Client`] over HTTP.
#[must_use]
pub struct ClientBuilder {
    endpoint: Arc<dyn JobEndpointProvider>,
    token: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Construct a new [`ClientBuilder`]
    ///
    /// # Example
    ///
    /// ```rust
    /// use uws_api::{ClientBuilder, UwsEndpoint};
    ///
    /// let _client = ClientBuilder::new(UwsEndpoint::new("https://host/api/uws"), "token")
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn new(endpoint: impl JobEndpointProvider + 'static, token: impl Into<String>) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
            token: token.into(),
            timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            connect_timeout: None,
        }
    }

    /// Overall timeout applied to each HTTP request, including reading the
    /// body of a download. Defaults to [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn with_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Returns a [`Client`] that uses this [`ClientBuilder`] configuration.
    ///
    /// # Errors
    ///
    /// [`UwsError::InvalidConfig`] when the token is not a valid header value
    /// or the HTTP client cannot be initialized.
    pub fn build(&mut self) -> Result<Client<HttpTransport>> {
        let transport =
            HttpTransport::with_timeouts(&self.token, self.timeout, self.connect_timeout)?;
        Ok(Client {
            endpoint: Arc::clone(&self.endpoint),
            transport,
        })
    }
}
