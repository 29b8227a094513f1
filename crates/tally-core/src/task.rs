//! Task model and lifecycle status.
//!
//! A task's identity, authorship, and creation time are immutable once
//! created; only `status` and `assignee` change afterwards, and only through
//! the state machine. The JSON shape is frozen because query responses
//! embed tasks verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifier of a task. Allocated sequentially from 1, never reused.
pub type TaskId = u64;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// The three lifecycle statuses.
///
/// Wire form is the display string, space included for `In Progress`.
/// Parsing is exact: `open`, `IN PROGRESS`, or padded input is not
/// recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Status {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Completed];

    /// Canonical wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus {
    /// The unrecognized input string.
    pub raw: String,
}

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown status '{}': expected one of Open, In Progress, Completed",
            self.raw
        )
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(Self::Open),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            _ => Err(UnknownStatus { raw: s.to_string() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// One unit of assignable work.
///
/// `createdAt` serializes as integer Unix milliseconds; the timestamp comes
/// from the coordinator's request metadata, never from the host clock, so
/// every replaying node materializes the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub creator: String,
    pub assignee: String,
    pub status: Status,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether `identity` is the creator or the current assignee.
    #[must_use]
    pub fn involves(&self, identity: &str) -> bool {
        self.creator == identity || self.assignee == identity
    }
}
