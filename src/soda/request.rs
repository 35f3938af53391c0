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

use uws_api::{JobParameters, Result, UwsError};

/// Parameters of a SODA cutout job.
///
/// Geometry strings are passed to the server untouched; the server validates
/// their syntax (e.g. `"RA DEC RADIUS"` for a circle).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutoutRequest {
    /// Identifiers of the images to cut out from, e.g. butler URIs
    pub image_ids: Vec<String>,
    pub pos: Vec<String>,
    pub circle: Vec<String>,
    pub polygon: Vec<String>,
    /// Optional client-provided job identifier
    pub run_id: Option<String>,
}

impl CutoutRequest {
    pub fn new<I, S>(image_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            image_ids: image_ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos.push(pos.into());
        self
    }

    pub fn with_circle(mut self, circle: impl Into<String>) -> Self {
        self.circle.push(circle.into());
        self
    }

    pub fn with_polygon(mut self, polygon: impl Into<String>) -> Self {
        self.polygon.push(polygon.into());
        self
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Builds the UWS form fields: one `id` per image, then any `pos`,
    /// `circle` and `polygon` values. The run id is not included; it is sent
    /// as `runid` by job creation.
    pub fn to_parameters(&self) -> Result<JobParameters> {
        if self.image_ids.is_empty() {
            return Err(UwsError::InvalidRequest(
                "at least one image id is required".to_string(),
            ));
        }
        let mut params = JobParameters::new();
        params
            .extend("id", self.image_ids.iter().cloned())
            .extend("pos", self.pos.iter().cloned())
            .extend("circle", self.circle.iter().cloned())
            .extend("polygon", self.polygon.iter().cloned());
        Ok(params)
    }
}
