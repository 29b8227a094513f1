#![forbid(unsafe_code)]
//! Deterministic task-ledger state machine for tally.
//!
//! This crate is the replayable heart of the node: pure, synchronous,
//! in-memory. It never touches the network, the filesystem, or the host
//! clock. Every input arrives through function arguments, so any two nodes
//! fed the same ordered request stream hold identical state and emit
//! byte-identical responses.
//!
//! - [`engine::advance`] applies one mutating request and returns the
//!   acceptance message, or an [`error::ActionError`] with state untouched.
//! - [`inspect::inspect`] answers one read-only query; it cannot fail.
//! - [`state::AppState`] owns everything the two entry points touch.

pub mod action;
pub mod engine;
pub mod error;
pub mod inspect;
pub mod state;
pub mod task;

pub use action::Action;
pub use engine::{TASK_REWARD, advance};
pub use error::{ActionError, ErrorKind};
pub use inspect::{Route, inspect};
pub use state::{AppState, Ledger, TaskStore};
pub use task::{Status, Task, TaskId};
