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

//! Reader for the UWS v1.0 job document.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::ParseError;
use crate::models::{ErrorSummary, Job, Parameter, Phase, ResultRef};

pub const UWS_NS: &str = "http://www.ivoa.net/xml/UWS/v1.0";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

#[derive(Debug, Clone, Copy)]
enum Scalar {
    JobId,
    RunId,
    OwnerId,
    Phase,
    CreationTime,
    StartTime,
    EndTime,
    ExecutionDuration,
    Destruction,
}

impl Scalar {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        let scalar = match name {
            b"jobId" => Scalar::JobId,
            b"runId" => Scalar::RunId,
            b"ownerId" => Scalar::OwnerId,
            b"phase" => Scalar::Phase,
            b"creationTime" => Scalar::CreationTime,
            b"startTime" => Scalar::StartTime,
            b"endTime" => Scalar::EndTime,
            b"executionDuration" => Scalar::ExecutionDuration,
            b"destruction" => Scalar::Destruction,
            _ => return None,
        };
        Some(scalar)
    }
}

#[derive(Debug)]
enum Target {
    Scalar(Scalar),
    Parameter(String),
    ErrorMessage,
}

/// Text collected for the element currently being read.
#[derive(Debug)]
struct Capture {
    target: Target,
    depth: usize,
    text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Section {
    #[default]
    Other,
    Parameters,
    Results,
    ErrorSummary,
}

#[derive(Debug, Default)]
struct Attributes {
    plain: Vec<(String, String)>,
    xlink_href: Option<String>,
}

impl Attributes {
    fn get(&self, name: &str) -> Option<&str> {
        self.plain
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn flag(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}

/// Job under construction while the document is streamed.
#[derive(Debug, Default)]
struct JobBuilder {
    job: Job,
    section: Section,
    capture: Option<Capture>,
}

fn is_uws(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(n)) if *n == UWS_NS.as_bytes())
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn attributes(reader: &NsReader<&[u8]>, e: &BytesStart) -> Result<Attributes, ParseError> {
    let mut attrs = Attributes::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        let (ns, local) = reader.resolve_attribute(attr.key);
        match ns {
            ResolveResult::Unbound => attrs
                .plain
                .push((String::from_utf8_lossy(local.as_ref()).into_owned(), value)),
            ResolveResult::Bound(Namespace(n))
                if n == XLINK_NS.as_bytes() && local.as_ref() == b"href" =>
            {
                attrs.xlink_href = Some(value)
            }
            _ => {}
        }
    }
    Ok(attrs)
}

impl JobBuilder {
    /// Handles an opening tag at `depth` (the root element is depth 1).
    fn open(
        &mut self,
        reader: &NsReader<&[u8]>,
        e: &BytesStart,
        depth: usize,
        in_uws: bool,
    ) -> Result<(), ParseError> {
        let local = e.local_name();
        if depth == 1 {
            if in_uws && local.as_ref() == b"job" {
                return Ok(());
            }
            return Err(ParseError::UnexpectedRoot(
                String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            ));
        }
        if depth == 2 {
            self.section = Section::Other;
        }
        if !in_uws {
            return Ok(());
        }
        match (depth, self.section, local.as_ref()) {
            (2, _, b"parameters") => self.section = Section::Parameters,
            (2, _, b"results") => self.section = Section::Results,
            (2, _, b"errorSummary") => {
                let attrs = attributes(reader, e)?;
                self.section = Section::ErrorSummary;
                self.job.error_summary = Some(ErrorSummary {
                    kind: attrs.get("type").and_then(non_empty),
                    has_detail: attrs.flag("hasDetail"),
                    message: None,
                });
            }
            (2, _, name) => {
                if let Some(scalar) = Scalar::from_local_name(name) {
                    self.start_capture(Target::Scalar(scalar), depth);
                }
            }
            (3, Section::Parameters, b"parameter") => {
                let attrs = attributes(reader, e)?;
                if let Some(id) = attrs.get("id").filter(|id| !id.is_empty()) {
                    self.job.parameters.insert(
                        id.to_string(),
                        Parameter {
                            value: None,
                            by_reference: attrs.flag("byReference"),
                            is_post: attrs.flag("isPost"),
                        },
                    );
                    self.start_capture(Target::Parameter(id.to_string()), depth);
                }
            }
            (3, Section::Results, b"result") => {
                let attrs = attributes(reader, e)?;
                self.job.results.push(ResultRef {
                    id: attrs.get("id").map(str::to_string),
                    href: attrs.xlink_href.clone(),
                    mime_type: attrs.get("mime-type").map(str::to_string),
                });
            }
            (3, Section::ErrorSummary, b"message") => {
                self.start_capture(Target::ErrorMessage, depth)
            }
            _ => {}
        }
        Ok(())
    }

    fn start_capture(&mut self, target: Target, depth: usize) {
        self.capture = Some(Capture {
            target,
            depth,
            text: String::new(),
        });
    }

    fn text(&mut self, text: &str, depth: usize) {
        if let Some(capture) = self.capture.as_mut() {
            if capture.depth == depth {
                capture.text.push_str(text);
            }
        }
    }

    /// Handles the closing of the element at `depth`.
    fn close(&mut self, depth: usize) {
        if depth == 2 {
            self.section = Section::Other;
        }
        let Some(capture) = self.capture.take_if(|c| c.depth == depth) else {
            return;
        };
        let value = non_empty(&capture.text);
        let job = &mut self.job;
        match capture.target {
            Target::Scalar(scalar) => match scalar {
                Scalar::JobId => job.job_id = value,
                Scalar::RunId => job.run_id = value,
                Scalar::OwnerId => job.owner_id = value,
                Scalar::Phase => {
                    job.phase = value.as_deref().map(Phase::parse).unwrap_or_default()
                }
                Scalar::CreationTime => job.creation_time = value,
                Scalar::StartTime => job.start_time = value,
                Scalar::EndTime => job.end_time = value,
                Scalar::ExecutionDuration => job.execution_duration = value,
                Scalar::Destruction => job.destruction = value,
            },
            Target::Parameter(id) => {
                if let Some(param) = job.parameters.get_mut(&id) {
                    param.value = value;
                }
            }
            Target::ErrorMessage => {
                if let Some(summary) = job.error_summary.as_mut() {
                    summary.message = value;
                }
            }
        }
    }
}

/// Parses a UWS job document into a [`Job`].
///
/// Scalar fields are looked up as UWS-namespaced children of the root
/// element; missing, empty and nil elements are left as `None`. A document
/// that is not well-formed XML, or whose root is not a UWS `job`, is an error.
pub fn parse_job(xml: &str) -> Result<Job, ParseError> {
    let mut reader = NsReader::from_str(xml);
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut builder = JobBuilder::default();

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let in_uws = is_uws(&ns);
        match event {
            Event::Start(e) => {
                let depth = open.len() + 1;
                seen_root = true;
                builder.open(&reader, &e, depth, in_uws)?;
                open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Empty(e) => {
                let depth = open.len() + 1;
                seen_root = true;
                builder.open(&reader, &e, depth, in_uws)?;
                builder.close(depth);
            }
            Event::Text(t) => builder.text(&t.unescape()?, open.len()),
            Event::CData(c) => builder.text(&String::from_utf8_lossy(&c), open.len()),
            Event::End(_) => {
                let depth = open.len();
                open.pop();
                builder.close(depth);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.pop() {
        return Err(ParseError::Truncated(name));
    }
    if !seen_root {
        return Err(ParseError::NoRoot);
    }
    Ok(builder.job)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETED_JOB: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"
         xmlns:xlink="http://www.w3.org/1999/xlink"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <uws:jobId>abc123</uws:jobId>
  <uws:runId>my-run</uws:runId>
  <uws:ownerId>someone</uws:ownerId>
  <uws:phase>COMPLETED</uws:phase>
  <uws:creationTime>2025-03-01T12:00:00.000Z</uws:creationTime>
  <uws:startTime>2025-03-01T12:00:01.000Z</uws:startTime>
  <uws:endTime>2025-03-01T12:00:09.000Z</uws:endTime>
  <uws:executionDuration>600</uws:executionDuration>
  <uws:destruction>2025-03-31T12:00:00.000Z</uws:destruction>
  <uws:parameters>
    <uws:parameter id="id">butler://dp02/20d28216</uws:parameter>
    <uws:parameter id="circle">55.7467 -32.2862 0.05</uws:parameter>
    <uws:parameter id="upload" byReference="true" isPost="false">https://host/in.xml</uws:parameter>
  </uws:parameters>
  <uws:results>
    <uws:result id="cutout" xlink:href="https://storage.host/r0.fits?X-Goog-Date=20250301&amp;X-Goog-Signature=a1b2" mime-type="application/fits"/>
    <uws:result id="preview" xlink:href="https://storage.host/r1.png" mime-type="image/png"></uws:result>
  </uws:results>
</uws:job>"#;

    #[test]
    fn parses_all_scalar_fields() {
        let job = parse_job(COMPLETED_JOB).unwrap();
        assert_eq!(job.job_id.as_deref(), Some("abc123"));
        assert_eq!(job.run_id.as_deref(), Some("my-run"));
        assert_eq!(job.owner_id.as_deref(), Some("someone"));
        assert_eq!(job.phase, Phase::Completed);
        assert_eq!(job.creation_time.as_deref(), Some("2025-03-01T12:00:00.000Z"));
        assert_eq!(job.end_time.as_deref(), Some("2025-03-01T12:00:09.000Z"));
        assert_eq!(job.execution_duration_secs(), Some(600));
        assert_eq!(job.destruction.as_deref(), Some("2025-03-31T12:00:00.000Z"));
        assert!(job.error_summary.is_none());
    }

    #[test]
    fn parses_parameters_with_flags() {
        let job = parse_job(COMPLETED_JOB).unwrap();
        assert_eq!(job.parameters.len(), 3);
        assert_eq!(
            job.parameters["circle"],
            Parameter {
                value: Some("55.7467 -32.2862 0.05".to_string()),
                by_reference: false,
                is_post: false,
            }
        );
        assert!(job.parameters["upload"].by_reference);
        assert!(!job.parameters["upload"].is_post);
    }

    #[test]
    fn result_hrefs_are_taken_from_xlink_attribute() {
        let job = parse_job(COMPLETED_JOB).unwrap();
        assert_eq!(job.results.len(), 2);
        assert_eq!(
            job.results[0],
            ResultRef {
                id: Some("cutout".to_string()),
                href: Some(
                    "https://storage.host/r0.fits?X-Goog-Date=20250301&X-Goog-Signature=a1b2"
                        .to_string()
                ),
                mime_type: Some("application/fits".to_string()),
            }
        );
        assert_eq!(job.results[1].href.as_deref(), Some("https://storage.host/r1.png"));
        assert_eq!(job.results[1].mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn result_count_matches_document() {
        for n in [0usize, 1, 7] {
            let results: String = (0..n)
                .map(|i| {
                    format!(
                        r#"<uws:result id="r{i}" xlink:href="https://host/r{i}.fits" mime-type="application/fits"/>"#
                    )
                })
                .collect();
            let xml = format!(
                r#"<uws:job xmlns:uws="{UWS_NS}" xmlns:xlink="{XLINK_NS}"><uws:jobId>j</uws:jobId><uws:phase>COMPLETED</uws:phase><uws:results>{results}</uws:results></uws:job>"#
            );
            let job = parse_job(&xml).unwrap();
            assert_eq!(job.results.len(), n);
            for (i, result) in job.results.iter().enumerate() {
                assert_eq!(result.href.as_deref(), Some(format!("https://host/r{i}.fits").as_str()));
            }
        }
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_job(COMPLETED_JOB).unwrap(), parse_job(COMPLETED_JOB).unwrap());
    }

    #[test]
    fn missing_and_nil_fields_are_absent() {
        let xml = r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"
                      xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
            <uws:jobId>j1</uws:jobId>
            <uws:phase>PENDING</uws:phase>
            <uws:startTime xsi:nil="true"/>
            <uws:endTime xsi:nil="true"></uws:endTime>
        </uws:job>"#;
        let job = parse_job(xml).unwrap();
        assert_eq!(job.job_id.as_deref(), Some("j1"));
        assert_eq!(job.phase, Phase::Pending);
        assert_eq!(job.start_time, None);
        assert_eq!(job.end_time, None);
        assert_eq!(job.run_id, None);
        assert!(job.parameters.is_empty());
        assert!(job.results.is_empty());
    }

    #[test]
    fn unknown_or_missing_phase_is_unknown() {
        let xml = r#"<job xmlns="http://www.ivoa.net/xml/UWS/v1.0"><jobId>j</jobId><phase>SHELVED</phase></job>"#;
        assert_eq!(parse_job(xml).unwrap().phase, Phase::Unknown);

        let xml = r#"<job xmlns="http://www.ivoa.net/xml/UWS/v1.0"><jobId>j</jobId></job>"#;
        assert_eq!(parse_job(xml).unwrap().phase, Phase::Unknown);
    }

    #[test]
    fn elements_outside_uws_namespace_are_ignored() {
        let xml = r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0" xmlns:x="urn:other">
            <x:phase>COMPLETED</x:phase>
            <uws:phase>EXECUTING</uws:phase>
            <uws:jobInfo><uws:jobId>nested</uws:jobId></uws:jobInfo>
        </uws:job>"#;
        let job = parse_job(xml).unwrap();
        assert_eq!(job.phase, Phase::Executing);
        assert_eq!(job.job_id, None);
    }

    #[test]
    fn parses_error_summary() {
        let xml = r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0">
            <uws:jobId>j</uws:jobId>
            <uws:phase>ERROR</uws:phase>
            <uws:errorSummary type="fatal" hasDetail="false">
              <uws:message>Image not found</uws:message>
            </uws:errorSummary>
        </uws:job>"#;
        let job = parse_job(xml).unwrap();
        assert_eq!(
            job.error_summary,
            Some(ErrorSummary {
                kind: Some("fatal".to_string()),
                has_detail: false,
                message: Some("Image not found".to_string()),
            })
        );
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        assert!(matches!(
            parse_job("Internal Server Error"),
            Err(ParseError::NoRoot)
        ));
        assert!(matches!(parse_job(""), Err(ParseError::NoRoot)));
        assert!(matches!(
            parse_job(r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"><uws:phase>QUEUED</uws:phase>"#),
            Err(ParseError::Truncated(name)) if name == "uws:job"
        ));
        assert!(parse_job("<job><phase>QUEUED</jobId></job>").is_err());
    }

    #[test]
    fn root_must_be_a_uws_job() {
        assert!(matches!(
            parse_job("<html><body>Maintenance</body></html>"),
            Err(ParseError::UnexpectedRoot(name)) if name == "html"
        ));
        assert!(matches!(
            parse_job(r#"<job><phase>COMPLETED</phase></job>"#),
            Err(ParseError::UnexpectedRoot(name)) if name == "job"
        ));
        assert!(matches!(
            parse_job(r#"<uws:jobs xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"/>"#),
            Err(ParseError::UnexpectedRoot(name)) if name == "uws:jobs"
        ));
        assert!(parse_job(r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"/>"#).is_ok());
    }
}
