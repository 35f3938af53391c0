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

//! # uws_api
//!
//! This is a Rust client for IVOA Universal Worker Service (UWS) job
//! endpoints: job submission, status polling and result download.
//!

pub mod blocking;
mod client;
mod endpoint;
mod error;
pub mod models;
mod parser;
mod transport;

pub use client::{Client, ClientBuilder, DOWNLOAD_CHUNK_SIZE};
pub use endpoint::{JobEndpointProvider, UwsEndpoint};
pub use error::{ParseError, Result, UwsError};
pub use models::{ErrorSummary, Job, JobParameters, Parameter, Phase, ResultRef};
pub use parser::{parse_job, UWS_NS, XLINK_NS};
pub use transport::{
    job_id_from_location, ByteStream, HttpTransport, Transport, DEFAULT_REQUEST_TIMEOUT,
};
