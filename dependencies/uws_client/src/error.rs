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

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::Phase;

pub type Result<T> = std::result::Result<T, UwsError>;

/// A UWS document that could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("document has no root element")]
    NoRoot,

    #[error("document ends before element <{0}> is closed")]
    Truncated(String),

    #[error("root element <{0}> is not a UWS job")]
    UnexpectedRoot(String),

    #[error("status of job {expected} reports job id {reported}")]
    JobIdMismatch { expected: String, reported: String },
}

/// Errors raised by the UWS client. None of them is recovered locally.
#[derive(Debug, Error)]
pub enum UwsError {
    /// The server answered with an unexpected HTTP status.
    #[error("request to {url} failed with status {status}: {body}")]
    RequestFailed {
        url: String,
        status: u16,
        body: String,
    },

    /// The request succeeded but the body is not a readable UWS document.
    #[error("failed to parse UWS response: {0}")]
    ParseFailed(#[from] ParseError),

    /// The job reached ERROR or ABORTED.
    #[error("job {job_id} failed with phase {phase}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    JobFailed {
        job_id: String,
        phase: Phase,
        message: Option<String>,
    },

    #[error("job {job_id} did not reach a terminal phase within {timeout:?}")]
    DeadlineExceeded { job_id: String, timeout: Duration },

    /// Local filesystem failure while saving a result.
    #[error("I/O error on {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request never produced a response (connection, TLS, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest_middleware::Error),

    /// Job creation was acknowledged without a usable `Location` header.
    #[error("job creation response has no job id (Location: {location:?})")]
    MissingJobId { location: Option<String> },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for UwsError {
    fn from(e: reqwest::Error) -> Self {
        UwsError::Network(reqwest_middleware::Error::Reqwest(e))
    }
}

impl UwsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UwsError::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// HTTP status of a [`UwsError::RequestFailed`].
    pub fn status(&self) -> Option<u16> {
        match self {
            UwsError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
