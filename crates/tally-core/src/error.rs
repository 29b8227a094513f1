//! Rejection taxonomy for advance requests.
//!
//! Every way an advance request can fail maps to one variant here. The
//! `Display` text of a variant is the exact payload reported back to the
//! coordinator, so replaying nodes produce byte-identical rejections.
//! Variants carry context fields (offending id, raw status) for log events;
//! those fields never leak into the message text.

use crate::task::TaskId;
use std::fmt;

// ---------------------------------------------------------------------------
// ErrorKind — broad failure classes
// ---------------------------------------------------------------------------

/// Classification of an [`ActionError`] for dispatch decisions and log
/// fields. All kinds are request-scoped: they abort the current request and
/// leave state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request payload is structurally or semantically unusable.
    Validation,
    /// The referenced task does not exist.
    NotFound,
    /// The sender is not permitted to perform the action.
    Authorization,
}

impl ErrorKind {
    /// Stable `snake_case` identifier for machine parsing and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Authorization => "authorization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActionError — one variant per distinct rejection
// ---------------------------------------------------------------------------

/// Why an advance request was rejected.
///
/// The message strings predate this crate; clients match on them, so they
/// are frozen as-is (capitalization, quoting, and trailing periods included).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The payload was not a JSON object of the expected shape. Carries the
    /// parser's own message, which becomes the reject payload.
    #[error("{detail}")]
    MalformedPayload { detail: String },

    /// `create` without a title, description, or assignee.
    #[error("Title, description, and assignee are required for task creation.")]
    MissingCreateFields,

    /// `update` without a task id or status.
    #[error("TaskId and status are required for update.")]
    MissingUpdateFields,

    /// `reassign` without a task id or assignee.
    #[error("TaskId and new assignee are required for reassignment.")]
    MissingReassignFields,

    /// The `action` tag is absent or not one of the known verbs.
    #[error("Invalid action. Use 'create', 'update', or 'reassign'.")]
    UnsupportedAction,

    /// The referenced task id has never been allocated.
    #[error("Task does not exist.")]
    TaskNotFound { id: TaskId },

    /// `update` from a sender who is neither creator nor assignee.
    #[error("Only the task creator or assignee can update the task.")]
    NotCreatorOrAssignee,

    /// `reassign` from a sender who is not the creator.
    #[error("Only the task creator can reassign the task.")]
    NotCreator,

    /// The requested status is not a recognized lifecycle value. Checked
    /// after authorization, so the raw text is preserved until then.
    #[error("Invalid status. Use 'Open', 'In Progress', or 'Completed'.")]
    InvalidStatus { raw: String },
}

impl ActionError {
    /// Classify the rejection for logging and dispatch.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedPayload { .. }
            | Self::MissingCreateFields
            | Self::MissingUpdateFields
            | Self::MissingReassignFields
            | Self::UnsupportedAction
            | Self::InvalidStatus { .. } => ErrorKind::Validation,
            Self::TaskNotFound { .. } => ErrorKind::NotFound,
            Self::NotCreatorOrAssignee | Self::NotCreator => ErrorKind::Authorization,
        }
    }
}
