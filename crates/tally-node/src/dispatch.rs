//! Request dispatch: the bridge between coordinator envelopes and the
//! deterministic core.
//!
//! [`handle`] is pure (state in, outcome out); [`poll_round`] adds one
//! transport round trip; [`run`] loops forever. Keeping the layers apart
//! keeps every routing decision testable without a live server.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tally_core::{AppState, advance, inspect};
use tracing::{debug, info, warn};

use crate::envelope::{FinishStatus, RequestKind, RollupRequest};
use crate::payload;
use crate::transport::RollupTransport;

// ---------------------------------------------------------------------------
// Outcome model
// ---------------------------------------------------------------------------

/// What a handled request sends back to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Status for the next finish POST.
    pub status: FinishStatus,
    /// Hex payload to publish before that POST.
    pub delivery: Delivery,
}

/// Where an outcome payload is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Provable output for accepted state changes.
    Notice(String),
    /// Diagnostic output for rejections and inspect responses.
    Report(String),
}

// ---------------------------------------------------------------------------
// Request handlers
// ---------------------------------------------------------------------------

/// Route one pending request through the core and package the result.
pub fn handle(state: &mut AppState, request: &RollupRequest) -> Outcome {
    match request.request_type {
        RequestKind::AdvanceState => handle_advance(state, request),
        RequestKind::InspectState => handle_inspect(state, request),
    }
}

fn handle_advance(state: &mut AppState, request: &RollupRequest) -> Outcome {
    let metadata = &request.data.metadata;
    debug!(
        epoch = metadata.epoch_index,
        input = metadata.input_index,
        block = metadata.block_number,
        sender = %metadata.msg_sender,
        "advance request"
    );

    let text = match payload::decode(&request.data.payload) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                input = metadata.input_index,
                error = %err,
                "advance payload is not decodable"
            );
            return Outcome {
                status: FinishStatus::Reject,
                delivery: Delivery::Report(payload::encode(&err.to_string())),
            };
        }
    };

    match advance(state, &metadata.msg_sender, request_time(metadata.timestamp), &text) {
        Ok(message) => {
            info!(
                input = metadata.input_index,
                sender = %metadata.msg_sender,
                "advance accepted"
            );
            Outcome {
                status: FinishStatus::Accept,
                delivery: Delivery::Notice(payload::encode(&message)),
            }
        }
        Err(err) => {
            warn!(
                input = metadata.input_index,
                sender = %metadata.msg_sender,
                kind = err.kind().as_str(),
                error = %err,
                "advance rejected"
            );
            Outcome {
                status: FinishStatus::Reject,
                delivery: Delivery::Report(payload::encode(&err.to_string())),
            }
        }
    }
}

fn handle_inspect(state: &AppState, request: &RollupRequest) -> Outcome {
    let body = match payload::decode(&request.data.payload) {
        Ok(query) => inspect(state, &request.data.metadata.msg_sender, &query),
        Err(err) => err.to_string(),
    };
    debug!(bytes = body.len(), "inspect answered");

    Outcome {
        status: FinishStatus::Accept,
        delivery: Delivery::Report(payload::encode(&body)),
    }
}

/// Block timestamps arrive as Unix seconds; out-of-range values fold to
/// the epoch rather than abort the input.
fn request_time(timestamp: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(timestamp, 0).single().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Poll loop
// ---------------------------------------------------------------------------

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// One trip through finish, dispatch, and delivery.
///
/// Posts the previous round's status, routes whatever the coordinator
/// hands back, and returns the status for the next round. Idle rounds
/// leave the state untouched and re-arm with accept.
///
/// # Errors
///
/// Returns an error if the finish poll or the output delivery fails.
pub fn poll_round<T: RollupTransport>(
    state: &mut AppState,
    rollup: &mut T,
    status: FinishStatus,
) -> Result<FinishStatus, T::Error> {
    let Some(request) = rollup.finish(status)? else {
        debug!("no pending rollup request");
        return Ok(FinishStatus::Accept);
    };

    let outcome = handle(state, &request);
    match &outcome.delivery {
        Delivery::Notice(hex) => rollup.send_notice(hex)?,
        Delivery::Report(hex) => rollup.send_report(hex)?,
    }
    Ok(outcome.status)
}

/// Drive the poll loop forever.
///
/// Transport failures are logged and retried after a short pause, with the
/// unacknowledged status posted again on the next round.
pub fn run<T: RollupTransport>(state: &mut AppState, rollup: &mut T) -> ! {
    let mut status = FinishStatus::Accept;
    loop {
        match poll_round(state, rollup, status) {
            Ok(next) => status = next,
            Err(err) => {
                warn!(error = %err, "rollup round failed; retrying");
                std::thread::sleep(RETRY_DELAY);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
