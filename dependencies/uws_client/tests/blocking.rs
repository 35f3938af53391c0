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
mod common;
use common::{job_xml, TOKEN};
use std::time::Duration;
use uws_api::{blocking, ClientBuilder, JobParameters, Phase, UwsEndpoint};

/// Runs a whole job lifecycle through the blocking facade.
#[test]
fn test_blocking_job_lifecycle() {
    common::setup();

    let mut server = mockito::Server::new();
    let create_mock = server
        .mock("POST", "/uws/jobs")
        .with_status(303)
        .with_header("location", &format!("{}/uws/jobs/job42", server.url()))
        .create();
    let result_href = format!("{}/files/out.fits", server.url());
    let status_mock = server
        .mock("GET", "/uws/jobs/job42")
        .with_status(200)
        .with_body(job_xml(
            "job42",
            "COMPLETED",
            &[("out", result_href.as_str())],
        ))
        .create();
    let file_mock = server
        .mock("GET", "/files/out.fits")
        .with_status(200)
        .with_body("FITS")
        .create();

    let async_client = ClientBuilder::new(UwsEndpoint::new(format!("{}/uws", server.url())), TOKEN)
        .build()
        .unwrap();
    let client = blocking::Client::new(async_client).unwrap();

    let mut params = JobParameters::new();
    params.push("id", "img1");
    let job_id = client.create_job(params, None, true).unwrap();
    assert_eq!(job_id, "job42");

    let job = client
        .wait_for_job(&job_id, Duration::from_secs(10), Duration::from_millis(10))
        .unwrap();
    assert_eq!(job.phase, Phase::Completed);

    let href = job.results[0].href.clone().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = client
        .download_result(&href, &dir.path().join("out.fits"))
        .unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "FITS");

    create_mock.assert();
    status_mock.assert();
    file_mock.assert();
}
