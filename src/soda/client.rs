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

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uws_api::{
    Client, ClientBuilder, HttpTransport, JobEndpointProvider, Result, Transport, UwsError,
};

use super::request::CutoutRequest;

pub const DEFAULT_BASE_URL: &str = "https://data-dev.lsst.cloud";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// SODA service whose async job list lives at `{base_url}/api/cutout/jobs`.
#[derive(Debug, Clone)]
pub struct SodaEndpoint {
    base_url: String,
}

impl SodaEndpoint {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }
}

impl JobEndpointProvider for SodaEndpoint {
    fn jobs_url(&self) -> String {
        format!("{}/api/cutout/jobs", self.base_url)
    }
}

/// How [`SodaClient::cutout`] waits for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoutOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for CutoutOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// File name of the result at `index` in the server's result list.
pub fn cutout_file_name(index: usize) -> String {
    format!("cutout_{}.fits", index)
}

/// Client for asynchronous SODA cutouts.
#[derive(Debug)]
pub struct SodaClient<T = HttpTransport> {
    client: Client<T>,
}

impl SodaClient<HttpTransport> {
    /// Constructs a client for the SODA service at `base_url`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vo_cutout::soda::SodaClient;
    ///
    /// let _client = SodaClient::new("https://data-dev.lsst.cloud", "token").unwrap();
    /// ```
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = ClientBuilder::new(SodaEndpoint::new(base_url), token).build()?;
        Ok(Self { client })
    }
}

impl<T: Transport> SodaClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: Client::with_transport(SodaEndpoint::new(base_url), transport),
        }
    }

    /// The underlying UWS client, for status queries on existing jobs.
    pub fn uws(&self) -> &Client<T> {
        &self.client
    }

    /// Creates a cutout job and returns its id.
    pub async fn create_cutout_job(
        &self,
        request: &CutoutRequest,
        auto_start: bool,
    ) -> Result<String> {
        let params = request.to_parameters()?;
        self.client
            .create_job(params, request.run_id.as_deref(), auto_start)
            .await
    }

    /// Runs a cutout job to completion and saves every result that has a
    /// download URL as `cutout_<i>.fits` under `output_dir`, where `i` is the
    /// result's position in the server list. Returns the paths written.
    ///
    /// # Errors
    ///
    /// - [`UwsError::JobFailed`] when the job ends in ERROR or ABORTED; no
    ///   result is downloaded.
    /// - any error of job creation, polling or download, unchanged. Files
    ///   already written are left in place.
    pub async fn cutout(
        &self,
        request: &CutoutRequest,
        output_dir: impl AsRef<Path>,
        options: &CutoutOptions,
    ) -> Result<Vec<PathBuf>> {
        self.run_cutout(request, output_dir.as_ref(), options)
            .await
            .inspect_err(|e| error!("Error during cutout process: {}", e))
    }

    async fn run_cutout(
        &self,
        request: &CutoutRequest,
        output_dir: &Path,
        options: &CutoutOptions,
    ) -> Result<Vec<PathBuf>> {
        let job_id = self.create_cutout_job(request, true).await?;
        info!("Created job {}", job_id);

        let job = self
            .client
            .wait_for_job(&job_id, options.timeout, options.poll_interval)
            .await?;
        if job.phase.is_failure() {
            return Err(UwsError::JobFailed {
                job_id,
                phase: job.phase,
                message: job.error_summary.and_then(|s| s.message),
            });
        }

        info!("Got {} results", job.results.len());
        let mut written = Vec::new();
        for (index, href) in job.downloadable_results() {
            let path = output_dir.join(cutout_file_name(index));
            debug!("Result {} of job {}: {}", index, job_id, href);
            written.push(self.client.download_result(href, &path).await?);
        }
        Ok(written)
    }
}
