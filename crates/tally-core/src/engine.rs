//! The advance-request state machine.
//!
//! [`advance`] is the only mutation entry point. It decodes the payload,
//! runs the verb's checks in a fixed order, and either applies exactly one
//! mutation and returns the acceptance message, or returns an error with
//! state untouched. Never both.
//!
//! # Check order
//!
//! `update` checks field presence, then task existence, then authorization,
//! then status validity. The order is observable through which rejection a
//! bad request earns, so it is frozen along with the message texts.

use crate::action::Action;
use crate::error::ActionError;
use crate::state::AppState;
use crate::task::{Status, TaskId};
use chrono::{DateTime, Utc};

/// Tokens credited to the assignee when a task first reaches `Completed`.
pub const TASK_REWARD: u64 = 10;

/// Apply one advance request to the state.
///
/// `sender` is the coordinator-authenticated identity behind the request
/// and `timestamp` the request's position in chain time; both come from the
/// request metadata, so replays see identical inputs.
///
/// # Errors
///
/// Any [`ActionError`]; the caller reports its `Display` text back to the
/// coordinator and rejects the input. State is untouched on error.
pub fn advance(
    state: &mut AppState,
    sender: &str,
    timestamp: DateTime<Utc>,
    payload: &str,
) -> Result<String, ActionError> {
    let action = Action::decode(payload)?;
    tracing::debug!(verb = action.verb(), sender, "decoded action");

    match action {
        Action::Create {
            title,
            description,
            assignee,
        } => {
            let id = state.tasks_mut().create(
                title,
                description,
                sender.to_string(),
                assignee,
                timestamp,
            );
            tracing::info!(task = id, creator = sender, "task created");
            Ok(format!("Task created with ID: {id}"))
        }
        Action::Update { task_id, status } => apply_update(state, sender, task_id, &status),
        Action::Reassign { task_id, assignee } => {
            apply_reassign(state, sender, task_id, assignee)
        }
    }
}

fn apply_update(
    state: &mut AppState,
    sender: &str,
    task_id: TaskId,
    status: &str,
) -> Result<String, ActionError> {
    let task = state
        .tasks_mut()
        .get_mut(task_id)
        .ok_or(ActionError::TaskNotFound { id: task_id })?;
    if !task.involves(sender) {
        return Err(ActionError::NotCreatorOrAssignee);
    }
    let next: Status = status.parse().map_err(|_| ActionError::InvalidStatus {
        raw: status.to_string(),
    })?;

    let prior = task.status;
    task.status = next;
    let assignee = task.assignee.clone();

    if next == Status::Completed && prior != Status::Completed {
        state.ledger_mut().credit(&assignee, TASK_REWARD);
        tracing::info!(
            task = task_id,
            assignee = %assignee,
            reward = TASK_REWARD,
            "task completed"
        );
        Ok(format!(
            "Task {task_id} marked as Completed. {assignee} earned {TASK_REWARD} tokens."
        ))
    } else {
        tracing::info!(task = task_id, status = %next, "task status updated");
        Ok(format!("Task {task_id} updated to status: {next}"))
    }
}

fn apply_reassign(
    state: &mut AppState,
    sender: &str,
    task_id: TaskId,
    assignee: String,
) -> Result<String, ActionError> {
    let task = state
        .tasks_mut()
        .get_mut(task_id)
        .ok_or(ActionError::TaskNotFound { id: task_id })?;
    if task.creator != sender {
        return Err(ActionError::NotCreator);
    }
    tracing::info!(task = task_id, assignee = %assignee, "task reassigned");
    let message = format!("Task {task_id} reassigned to {assignee}");
    task.assignee = assignee;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ALICE: &str = "0xa11ce";
    const BOB: &str = "0xb0b";
    const EVE: &str = "0xe5e";

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    fn create_task(state: &mut AppState, creator: &str, assignee: &str) -> TaskId {
        let payload = serde_json::json!({
            "action": "create",
            "title": "Write release notes",
            "description": "Cover the ledger changes",
            "assignee": assignee,
        })
        .to_string();
        advance(state, creator, ts(1_700_000_000), &payload).expect("create should succeed");
        state.tasks().last_id()
    }

    fn update_status(
        state: &mut AppState,
        sender: &str,
        task_id: TaskId,
        status: &str,
    ) -> Result<String, ActionError> {
        let payload = serde_json::json!({
            "action": "update",
            "taskId": task_id,
            "status": status,
        })
        .to_string();
        advance(state, sender, ts(1_700_000_100), &payload)
    }

    // -----------------------------------------------------------------------
    // create
    // -----------------------------------------------------------------------

    #[test]
    fn create_allocates_sequential_ids() {
        let mut state = AppState::new();
        let first = create_task(&mut state, ALICE, BOB);
        let second = create_task(&mut state, BOB, ALICE);
        assert_eq!((first, second), (1, 2));

        let task = state.tasks().get(1).expect("task exists");
        assert_eq!(task.creator, ALICE);
        assert_eq!(task.assignee, BOB);
        assert_eq!(task.status, Status::Open);
        assert_eq!(task.created_at, ts(1_700_000_000));
    }

    #[test]
    fn create_message_names_the_id() {
        let mut state = AppState::new();
        let payload = serde_json::json!({
            "action": "create",
            "title": "t",
            "description": "d",
            "assignee": BOB,
        })
        .to_string();
        let message = advance(&mut state, ALICE, ts(0), &payload).expect("create should succeed");
        assert_eq!(message, "Task created with ID: 1");
    }

    #[test]
    fn create_timestamp_comes_from_metadata() {
        let mut state = AppState::new();
        let payload = serde_json::json!({
            "action": "create",
            "title": "t",
            "description": "d",
            "assignee": BOB,
        })
        .to_string();
        advance(&mut state, ALICE, ts(42), &payload).expect("create should succeed");
        let task = state.tasks().get(1).expect("task exists");
        assert_eq!(task.created_at, ts(42));
    }

    // -----------------------------------------------------------------------
    // update and the reward rule
    // -----------------------------------------------------------------------

    #[test]
    fn completion_pays_the_assignee_once() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);

        let message =
            update_status(&mut state, BOB, id, "Completed").expect("completion should succeed");
        assert_eq!(message, "Task 1 marked as Completed. 0xb0b earned 10 tokens.");
        assert_eq!(state.ledger().balance(BOB), TASK_REWARD);

        // Completing an already-completed task changes nothing in the ledger.
        let message =
            update_status(&mut state, BOB, id, "Completed").expect("repeat update should succeed");
        assert_eq!(message, "Task 1 updated to status: Completed");
        assert_eq!(state.ledger().balance(BOB), TASK_REWARD);
    }

    #[test]
    fn reopen_keeps_the_reward_and_recompletion_pays_again() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);

        update_status(&mut state, BOB, id, "Completed").expect("complete");
        update_status(&mut state, BOB, id, "Open").expect("reopen");
        assert_eq!(state.ledger().balance(BOB), 10);

        let message = update_status(&mut state, BOB, id, "Completed").expect("recomplete");
        assert_eq!(message, "Task 1 marked as Completed. 0xb0b earned 10 tokens.");
        assert_eq!(state.ledger().balance(BOB), 20);
    }

    #[test]
    fn reward_goes_to_current_assignee_not_sender() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);

        // The creator completes the task; the assignee earns the reward.
        let message =
            update_status(&mut state, ALICE, id, "Completed").expect("creator may update");
        assert_eq!(message, "Task 1 marked as Completed. 0xb0b earned 10 tokens.");
        assert_eq!(state.ledger().balance(BOB), 10);
        assert_eq!(state.ledger().balance(ALICE), 0);
    }

    #[test]
    fn non_completion_updates_pay_nothing() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);

        let message =
            update_status(&mut state, BOB, id, "In Progress").expect("update should succeed");
        assert_eq!(message, "Task 1 updated to status: In Progress");
        assert_eq!(state.ledger().balance(BOB), 0);
        assert_eq!(state.tasks().get(id).expect("task exists").status, Status::InProgress);
    }

    #[test]
    fn update_rejects_missing_task() {
        let mut state = AppState::new();
        let err = update_status(&mut state, ALICE, 7, "Open").unwrap_err();
        assert_eq!(err, ActionError::TaskNotFound { id: 7 });
        assert_eq!(err.to_string(), "Task does not exist.");
    }

    #[test]
    fn update_rejects_strangers() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);
        let err = update_status(&mut state, EVE, id, "Completed").unwrap_err();
        assert_eq!(err, ActionError::NotCreatorOrAssignee);
        assert_eq!(state.tasks().get(id).expect("task exists").status, Status::Open);
        assert_eq!(state.ledger().balance(BOB), 0);
    }

    #[test]
    fn update_checks_authorization_before_status_validity() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);

        // A stranger sending a bad status hits the authorization wall first.
        let err = update_status(&mut state, EVE, id, "Nonsense").unwrap_err();
        assert_eq!(err, ActionError::NotCreatorOrAssignee);

        // A party sending the same bad status reaches the validity check.
        let err = update_status(&mut state, BOB, id, "Nonsense").unwrap_err();
        assert_eq!(err, ActionError::InvalidStatus { raw: "Nonsense".into() });
        assert_eq!(state.tasks().get(id).expect("task exists").status, Status::Open);
    }

    #[test]
    fn update_rejects_case_variant_statuses() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);
        for raw in ["open", "completed", "IN PROGRESS", "InProgress"] {
            let err = update_status(&mut state, BOB, id, raw).unwrap_err();
            assert!(
                matches!(err, ActionError::InvalidStatus { .. }),
                "status {raw:?} gave {err:?}"
            );
        }
    }

    // -----------------------------------------------------------------------
    // reassign
    // -----------------------------------------------------------------------

    #[test]
    fn creator_reassigns_and_only_assignee_changes() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);
        update_status(&mut state, BOB, id, "In Progress").expect("update");

        let payload = serde_json::json!({
            "action": "reassign",
            "taskId": id,
            "assignee": EVE,
        })
        .to_string();
        let message =
            advance(&mut state, ALICE, ts(1_700_000_200), &payload).expect("creator may reassign");
        assert_eq!(message, "Task 1 reassigned to 0xe5e");

        let task = state.tasks().get(id).expect("task exists");
        assert_eq!(task.assignee, EVE);
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.creator, ALICE);
    }

    #[test]
    fn assignee_cannot_reassign() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);

        let payload = serde_json::json!({
            "action": "reassign",
            "taskId": id,
            "assignee": BOB,
        })
        .to_string();
        let err = advance(&mut state, BOB, ts(0), &payload).unwrap_err();
        assert_eq!(err, ActionError::NotCreator);
        assert_eq!(err.to_string(), "Only the task creator can reassign the task.");
        assert_eq!(state.tasks().get(id).expect("task exists").assignee, BOB);
    }

    #[test]
    fn reassign_then_complete_pays_the_new_assignee() {
        let mut state = AppState::new();
        let id = create_task(&mut state, ALICE, BOB);

        let payload = serde_json::json!({
            "action": "reassign",
            "taskId": id,
            "assignee": EVE,
        })
        .to_string();
        advance(&mut state, ALICE, ts(0), &payload).expect("reassign");

        update_status(&mut state, ALICE, id, "Completed").expect("complete");
        assert_eq!(state.ledger().balance(EVE), 10);
        assert_eq!(state.ledger().balance(BOB), 0);
    }

    // -----------------------------------------------------------------------
    // failure purity
    // -----------------------------------------------------------------------

    #[test]
    fn failed_requests_leave_state_untouched() {
        let mut state = AppState::new();
        create_task(&mut state, ALICE, BOB);
        let snapshot = state.clone();

        let failures = [
            (EVE, r#"{"action":"update","taskId":1,"status":"Completed"}"#),
            (ALICE, r#"{"action":"update","taskId":9,"status":"Open"}"#),
            (ALICE, r#"{"action":"update","taskId":1,"status":"Done"}"#),
            (BOB, r#"{"action":"reassign","taskId":1,"assignee":"0xe5e"}"#),
            (ALICE, r#"{"action":"create","title":"","description":"d","assignee":"a"}"#),
            (ALICE, r#"{"action":"destroy"}"#),
            (ALICE, "not json"),
        ];
        for (sender, payload) in failures {
            advance(&mut state, sender, ts(0), payload).unwrap_err();
            assert_eq!(state, snapshot, "state changed for payload {payload:?}");
        }
    }
}
