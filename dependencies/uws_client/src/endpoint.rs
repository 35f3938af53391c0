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

/// Supplies the URL of a service's job list. Everything else in
/// [`Client`](crate::Client) is written against this capability.
pub trait JobEndpointProvider: Send + Sync {
    /// URL of the jobs collection, without a trailing slash.
    fn jobs_url(&self) -> String;

    /// URL of a single job below the jobs collection.
    fn job_url(&self, job_id: &str) -> String {
        format!("{}/{}", self.jobs_url(), job_id)
    }
}

/// Generic UWS service whose job list lives at `{base_url}/jobs`.
#[derive(Debug, Clone)]
pub struct UwsEndpoint {
    base_url: String,
}

impl UwsEndpoint {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl JobEndpointProvider for UwsEndpoint {
    fn jobs_url(&self) -> String {
        format!("{}/jobs", self.base_url)
    }
}
