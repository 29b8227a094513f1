//! Owned application state: task store and balance ledger.
//!
//! Read access is public; mutation is `pub(crate)` so every write flows
//! through the state machine in [`crate::engine`]. Both stores sit on
//! `BTreeMap`, so iteration order is id order (creation order for tasks)
//! and replaying nodes serialize identical query responses.

use crate::task::{Status, Task, TaskId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// TaskStore
// ---------------------------------------------------------------------------

/// All tasks ever created, keyed by id.
///
/// Ids are allocated sequentially starting at 1. The counter only moves
/// forward; tasks are never deleted, so an id that existed once exists
/// forever.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: BTreeMap<TaskId, Task>,
    last_id: TaskId,
}

impl TaskStore {
    /// Allocate the next id and insert a new `Open` task.
    pub(crate) fn create(
        &mut self,
        title: String,
        description: String,
        creator: String,
        assignee: String,
        created_at: DateTime<Utc>,
    ) -> TaskId {
        self.last_id += 1;
        let id = self.last_id;
        self.tasks.insert(
            id,
            Task {
                id,
                title,
                description,
                creator,
                assignee,
                status: Status::Open,
                created_at,
            },
        );
        id
    }

    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    /// Every task in creation order (ids ascend).
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The most recently allocated id, 0 if no task was ever created.
    #[must_use]
    pub const fn last_id(&self) -> TaskId {
        self.last_id
    }
}

impl<'a> IntoIterator for &'a TaskStore {
    type Item = &'a Task;
    type IntoIter = std::collections::btree_map::Values<'a, TaskId, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.values()
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Token balances by identity. Identities never seen hold an implicit 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    balances: BTreeMap<String, u64>,
}

impl Ledger {
    /// Add `amount` to `identity`, starting from 0 for a first credit.
    pub(crate) fn credit(&mut self, identity: &str, amount: u64) {
        let balance = self.balances.entry(identity.to_string()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Current balance, 0 for identities never credited.
    #[must_use]
    pub fn balance(&self, identity: &str) -> u64 {
        self.balances.get(identity).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The whole deterministic state: every task plus every balance.
///
/// There is exactly one of these per node, owned by the dispatch loop and
/// threaded by reference. Two states fed the same request sequence compare
/// equal, which is what the replay tests assert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    tasks: TaskStore,
    ledger: Ledger,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub(crate) const fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    pub(crate) const fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
}
