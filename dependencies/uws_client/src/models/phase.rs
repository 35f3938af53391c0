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

use serde::{Deserialize, Serialize};

use std::fmt;

/// Execution phase of a UWS job, as reported by the server.
// SCREAMING_SNAKE_CASE matches the literal phase strings of the UWS schema,
// e.g. "EXECUTING".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Pending,
    Queued,
    Executing,
    Completed,
    Error,
    Aborted,
    Held,
    Suspended,
    Archived,
    /// Any phase string this client does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Phase {
    /// Maps a phase string to a [`Phase`]. Unrecognized values become
    /// [`Phase::Unknown`] so that protocol extensions never fail parsing.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "PENDING" => Phase::Pending,
            "QUEUED" => Phase::Queued,
            "EXECUTING" => Phase::Executing,
            "COMPLETED" => Phase::Completed,
            "ERROR" => Phase::Error,
            "ABORTED" => Phase::Aborted,
            "HELD" => Phase::Held,
            "SUSPENDED" => Phase::Suspended,
            "ARCHIVED" => Phase::Archived,
            _ => Phase::Unknown,
        }
    }

    /// Returns true once the server will no longer move the job on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Error | Phase::Aborted)
    }

    /// Returns true for the terminal phases that mean the job did not succeed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Phase::Error | Phase::Aborted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pending => "PENDING",
            Phase::Queued => "QUEUED",
            Phase::Executing => "EXECUTING",
            Phase::Completed => "COMPLETED",
            Phase::Error => "ERROR",
            Phase::Aborted => "ABORTED",
            Phase::Held => "HELD",
            Phase::Suspended => "SUSPENDED",
            Phase::Archived => "ARCHIVED",
            Phase::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_set_is_completed_error_aborted() {
        let terminal: Vec<Phase> = [
            Phase::Pending,
            Phase::Queued,
            Phase::Executing,
            Phase::Completed,
            Phase::Error,
            Phase::Aborted,
            Phase::Held,
            Phase::Suspended,
            Phase::Archived,
            Phase::Unknown,
        ]
        .into_iter()
        .filter(Phase::is_terminal)
        .collect();
        assert_eq!(
            terminal,
            vec![Phase::Completed, Phase::Error, Phase::Aborted]
        );
        assert!(!Phase::Completed.is_failure());
        assert!(Phase::Aborted.is_failure());
    }

    #[test]
    fn unrecognized_phase_maps_to_unknown() {
        assert_eq!(Phase::parse("EXECUTING"), Phase::Executing);
        assert_eq!(Phase::parse(" HELD\n"), Phase::Held);
        assert_eq!(Phase::parse("RUNNING"), Phase::Unknown);
        assert_eq!(Phase::parse("completed"), Phase::Unknown);
    }
}
