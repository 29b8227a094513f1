//! Read-only inspection queries.
//!
//! Inspect payloads are space-separated text: a route keyword, then
//! positional parameters. Queries never fail and never mutate: unknown
//! routes answer with a usage line, and a malformed or missing `task`
//! parameter folds into the missing-task answer. Unknown identities see
//! empty or zero results, never an error.

use crate::state::AppState;
use crate::task::{Task, TaskId};

const MISSING_TASK: &str = "Task does not exist.";
const USAGE: &str = "Invalid route. Use 'list', 'task <taskId>', 'balance', or 'my_tasks'.";

// ---------------------------------------------------------------------------
// Route — decoded query
// ---------------------------------------------------------------------------

/// A decoded inspect route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Every task, creation order.
    List,
    /// One task by id. `None` when the parameter is missing or does not
    /// carry a numeric id after its `/`.
    Task(Option<TaskId>),
    /// The sender's token balance.
    Balance,
    /// Tasks the sender created or is assigned, creation order.
    MyTasks,
    /// Anything else; answered with the usage line.
    Unknown,
}

impl Route {
    /// Split the payload on single spaces and read the route keyword.
    /// Extra parameters beyond what a route consumes are ignored.
    #[must_use]
    pub fn decode(payload: &str) -> Self {
        let mut tokens = payload.split(' ');
        let route = tokens.next().unwrap_or("");
        match route {
            "list" => Self::List,
            "task" => Self::Task(tokens.next().and_then(parse_task_param)),
            "balance" => Self::Balance,
            "my_tasks" => Self::MyTasks,
            _ => Self::Unknown,
        }
    }
}

/// The id is the text after the first `/` in the parameter (`tasks/3`).
/// A parameter without a slash never names a task.
fn parse_task_param(param: &str) -> Option<TaskId> {
    param.split('/').nth(1)?.parse().ok()
}

// ---------------------------------------------------------------------------
// inspect — the query engine
// ---------------------------------------------------------------------------

/// Answer one inspect request.
#[must_use]
pub fn inspect(state: &AppState, sender: &str, payload: &str) -> String {
    let route = Route::decode(payload);
    tracing::debug!(?route, sender, "inspect query");

    match route {
        Route::List => tasks_json(state.tasks().iter()),
        Route::Task(id) => id
            .and_then(|id| state.tasks().get(id))
            .map_or_else(|| MISSING_TASK.to_string(), task_json),
        Route::Balance => balance_json(state.ledger().balance(sender)),
        Route::MyTasks => tasks_json(state.tasks().iter().filter(|task| task.involves(sender))),
        Route::Unknown => USAGE.to_string(),
    }
}

fn task_json(task: &Task) -> String {
    serde_json::to_string(task).expect("task JSON serialization cannot fail")
}

fn tasks_json<'a>(tasks: impl Iterator<Item = &'a Task>) -> String {
    let tasks: Vec<&Task> = tasks.collect();
    serde_json::to_string(&tasks).expect("task JSON serialization cannot fail")
}

fn balance_json(balance: u64) -> String {
    serde_json::json!({ "balance": balance }).to_string()
}
