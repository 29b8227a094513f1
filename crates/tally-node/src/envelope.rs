//! Wire types for the coordinator's JSON bodies.
//!
//! The shapes mirror the rollup HTTP API exactly: `/finish` hands back a
//! [`RollupRequest`], and the node posts [`FinishRequest`] and
//! [`OutputPayload`] bodies upstream. Inspect requests arrive without
//! metadata, so the whole [`Metadata`] block defaults.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A pending request handed out by `/finish`.
#[derive(Debug, Clone, Deserialize)]
pub struct RollupRequest {
    pub request_type: RequestKind,
    pub data: RequestData,
}

/// Which handler a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    AdvanceState,
    InspectState,
}

/// Payload and metadata of a pending request.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestData {
    #[serde(default)]
    pub metadata: Metadata,
    /// `0x`-prefixed hex of the request text.
    pub payload: String,
}

/// Input metadata stamped by the coordinator on advance requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub msg_sender: String,
    pub epoch_index: u64,
    pub input_index: u64,
    pub block_number: u64,
    /// Block timestamp in Unix seconds; the only clock the core sees.
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Body posted to `/finish`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FinishRequest {
    pub status: FinishStatus,
}

/// Verdict on the previously handled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishStatus {
    Accept,
    Reject,
}

/// Body posted to `/notice` and `/report`.
#[derive(Debug, Clone, Serialize)]
pub struct OutputPayload {
    /// `0x`-prefixed hex of the output text.
    pub payload: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
