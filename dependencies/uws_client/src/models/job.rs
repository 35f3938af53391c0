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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::phase::Phase;

/// Client-side projection of a UWS job, replaced as a whole by every status
/// fetch.
///
/// Scalar fields hold the server text as-is; `None` means the element was
/// absent, empty or nil.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: Option<String>,
    pub run_id: Option<String>,
    pub owner_id: Option<String>,
    pub phase: Phase,
    pub creation_time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub execution_duration: Option<String>,
    pub destruction: Option<String>,
    pub parameters: BTreeMap<String, Parameter>,
    pub results: Vec<ResultRef>,
    pub error_summary: Option<ErrorSummary>,
}

/// A job parameter as echoed back by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub value: Option<String>,
    pub by_reference: bool,
    pub is_post: bool,
}

/// Reference to a job output. The output itself is fetched separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRef {
    pub id: Option<String>,
    pub href: Option<String>,
    pub mime_type: Option<String>,
}

/// Server-side description of why a job failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// `transient` or `fatal`
    pub kind: Option<String>,
    pub has_detail: bool,
    pub message: Option<String>,
}

fn parse_timestamp(value: Option<&String>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
        .map(|t| t.with_timezone(&Utc))
}

impl Job {
    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.creation_time.as_ref())
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.start_time.as_ref())
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.end_time.as_ref())
    }

    pub fn destruction_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.destruction.as_ref())
    }

    /// Maximum execution time granted by the server, in seconds. 0 means
    /// unlimited.
    pub fn execution_duration_secs(&self) -> Option<u64> {
        self.execution_duration
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
    }

    /// Whether the server's destruction time has passed at `now`.
    ///
    /// Informational only: the client never acts on it.
    pub fn is_destroyed_at(&self, now: DateTime<Utc>) -> bool {
        self.destruction_time().is_some_and(|t| t <= now)
    }

    /// Results that carry a download URL, with their position in the server
    /// list.
    pub fn downloadable_results(&self) -> impl Iterator<Item = (usize, &str)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| match r.href.as_deref() {
                Some(href) if !href.is_empty() => Some((i, href)),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_parse_on_demand() {
        let job = Job {
            creation_time: Some("2025-03-01T12:00:00.000Z".to_string()),
            destruction: Some("2025-03-31T12:00:00Z".to_string()),
            start_time: Some("not a date".to_string()),
            execution_duration: Some("600".to_string()),
            ..Default::default()
        };
        assert_eq!(
            job.creation_time(),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(job.start_time(), None);
        assert_eq!(job.end_time(), None);
        assert_eq!(job.execution_duration_secs(), Some(600));

        let before = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        assert!(!job.is_destroyed_at(before));
        assert!(job.is_destroyed_at(after));
    }

    #[test]
    fn downloadable_results_keep_server_positions() {
        let job = Job {
            results: vec![
                ResultRef {
                    href: Some("https://host/r0.fits".to_string()),
                    ..Default::default()
                },
                ResultRef::default(),
                ResultRef {
                    href: Some(String::new()),
                    ..Default::default()
                },
                ResultRef {
                    href: Some("https://host/r3.fits".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let found: Vec<(usize, &str)> = job.downloadable_results().collect();
        assert_eq!(
            found,
            vec![(0, "https://host/r0.fits"), (3, "https://host/r3.fits")]
        );
    }
}
