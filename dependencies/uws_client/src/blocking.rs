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

//! Blocking facade over the asynchronous [`Client`](crate::Client).
//!
//! Every call drives the asynchronous client to completion on a runtime owned
//! by the facade, so the poll loop blocks the calling thread between polls.
//! Must not be used from within an asynchronous context.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

use crate::error::{Result, UwsError};
use crate::models::{Job, JobParameters, ResultRef};
use crate::transport::{HttpTransport, Transport};

/// A blocking UWS `Client`.
#[derive(Debug)]
pub struct Client<T = HttpTransport> {
    inner: crate::Client<T>,
    runtime: Runtime,
}

impl<T: Transport> Client<T> {
    pub fn new(inner: crate::Client<T>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| UwsError::InvalidConfig(format!("failed to start runtime: {e}")))?;
        Ok(Self { inner, runtime })
    }

    pub fn create_job(
        &self,
        params: JobParameters,
        run_id: Option<&str>,
        auto_start: bool,
    ) -> Result<String> {
        self.runtime
            .block_on(self.inner.create_job(params, run_id, auto_start))
    }

    pub fn get_job(&self, job_id: &str) -> Result<Job> {
        self.runtime.block_on(self.inner.get_job(job_id))
    }

    pub fn get_job_results(&self, job_id: &str) -> Result<Vec<ResultRef>> {
        self.runtime.block_on(self.inner.get_job_results(job_id))
    }

    pub fn wait_for_job(
        &self,
        job_id: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Job> {
        self.runtime
            .block_on(self.inner.wait_for_job(job_id, timeout, poll_interval))
    }

    pub fn download_result(&self, result_href: &str, output_path: &Path) -> Result<PathBuf> {
        self.runtime
            .block_on(self.inner.download_result(result_href, output_path))
    }
}
