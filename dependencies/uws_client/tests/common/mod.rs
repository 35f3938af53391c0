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

#![allow(dead_code)]

pub const TOKEN: &str = "test-token";

pub fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn job_xml(job_id: &str, phase: &str, results: &[(&str, &str)]) -> String {
    let results: String = results
        .iter()
        .map(|(id, href)| {
            format!(r#"<uws:result id="{id}" xlink:href="{href}" mime-type="application/fits"/>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0" xmlns:xlink="http://www.w3.org/1999/xlink">
  <uws:jobId>{job_id}</uws:jobId>
  <uws:ownerId>someone</uws:ownerId>
  <uws:phase>{phase}</uws:phase>
  <uws:results>{results}</uws:results>
</uws:job>"#
    )
}
