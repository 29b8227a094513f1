//! Advance-payload decoding into typed actions.
//!
//! The payload is a JSON object `{action, taskId, title, description,
//! assignee, status}` with every field optional at the JSON level. Decoding
//! applies presence rules on top: an empty string counts as missing, and a
//! task id of 0 counts as missing (no task ever holds id 0). What survives
//! becomes a tagged [`Action`] variant; unknown `action` tags never reach
//! the state machine.

use crate::error::ActionError;
use crate::task::TaskId;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// RawRequest — the wire shape before presence checks
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    action: Option<String>,
    task_id: Option<TaskId>,
    title: Option<String>,
    description: Option<String>,
    assignee: Option<String>,
    status: Option<String>,
}

/// Treat empty strings like absent fields.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Treat id 0 like an absent field.
fn present_id(field: Option<TaskId>) -> Option<TaskId> {
    field.filter(|id| *id != 0)
}

// ---------------------------------------------------------------------------
// Action — the tagged verb
// ---------------------------------------------------------------------------

/// A decoded advance action, ready for the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a new task.
    Create {
        title: String,
        description: String,
        assignee: String,
    },
    /// Change a task's lifecycle status. `status` stays raw text here:
    /// its validity is checked after authorization, so an unauthorized
    /// sender learns nothing about the status value.
    Update { task_id: TaskId, status: String },
    /// Hand a task to a different assignee.
    Reassign { task_id: TaskId, assignee: String },
}

impl Action {
    /// Decode a UTF-8 advance payload into a typed action.
    ///
    /// # Errors
    ///
    /// `MalformedPayload` when the text is not a JSON object of the
    /// expected field types; `UnsupportedAction` when the `action` tag is
    /// absent or unknown; the per-verb `Missing*Fields` errors when a
    /// required field is absent, empty, or 0.
    pub fn decode(payload: &str) -> Result<Self, ActionError> {
        let raw: RawRequest = serde_json::from_str(payload).map_err(|err| {
            ActionError::MalformedPayload {
                detail: err.to_string(),
            }
        })?;

        match raw.action.as_deref() {
            Some("create") => match (
                present(raw.title),
                present(raw.description),
                present(raw.assignee),
            ) {
                (Some(title), Some(description), Some(assignee)) => Ok(Self::Create {
                    title,
                    description,
                    assignee,
                }),
                _ => Err(ActionError::MissingCreateFields),
            },
            Some("update") => match (present_id(raw.task_id), present(raw.status)) {
                (Some(task_id), Some(status)) => Ok(Self::Update { task_id, status }),
                _ => Err(ActionError::MissingUpdateFields),
            },
            Some("reassign") => match (present_id(raw.task_id), present(raw.assignee)) {
                (Some(task_id), Some(assignee)) => Ok(Self::Reassign { task_id, assignee }),
                _ => Err(ActionError::MissingReassignFields),
            },
            _ => Err(ActionError::UnsupportedAction),
        }
    }

    /// The wire verb, for log fields.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Reassign { .. } => "reassign",
        }
    }
}
