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

//! SODA (Server-side Operation for Data Access) cutouts over UWS

mod client;
mod request;

pub use client::{
    cutout_file_name, CutoutOptions, SodaClient, SodaEndpoint, DEFAULT_BASE_URL,
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT,
};
pub use request::CutoutRequest;
