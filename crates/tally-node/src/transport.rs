//! Transport to the coordinating rollup server.
//!
//! The dispatch loop is transport-agnostic: anything implementing
//! [`RollupTransport`] can carry it. Production runs over blocking HTTP
//! ([`HttpRollup`]); loop tests script the coordinator in memory.

use anyhow::Context as _;

use crate::envelope::{FinishRequest, FinishStatus, OutputPayload, RollupRequest};

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// Abstraction over the coordinator's HTTP surface.
///
/// Implementations shuttle finish statuses up and pending requests down,
/// and deliver the notice and report payloads the dispatch loop produces.
pub trait RollupTransport {
    /// Error type for transport operations.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Post the outcome of the previous round and fetch the next pending
    /// request. `Ok(None)` means the coordinator had nothing queued yet.
    fn finish(&mut self, status: FinishStatus) -> Result<Option<RollupRequest>, Self::Error>;

    /// Publish a provable notice payload (`0x` hex).
    fn send_notice(&mut self, payload: &str) -> Result<(), Self::Error>;

    /// Publish a diagnostic report payload (`0x` hex).
    fn send_report(&mut self, payload: &str) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// HTTP transport
// ---------------------------------------------------------------------------

/// Blocking HTTP client for a live coordinator.
#[derive(Debug, Clone)]
pub struct HttpRollup {
    base_url: String,
}

impl HttpRollup {
    /// Create a transport against a coordinator base URL such as
    /// `http://127.0.0.1:5004`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn post_output(&self, endpoint: &str, payload: &str) -> anyhow::Result<()> {
        let url = format!("{}/{endpoint}", self.base_url);
        ureq::post(&url)
            .send_json(OutputPayload {
                payload: payload.to_string(),
            })
            .map_err(|err| anyhow::anyhow!("{endpoint} delivery to {url} failed: {err}"))?;
        Ok(())
    }
}

impl RollupTransport for HttpRollup {
    type Error = anyhow::Error;

    fn finish(&mut self, status: FinishStatus) -> Result<Option<RollupRequest>, Self::Error> {
        let url = format!("{}/finish", self.base_url);
        let response = ureq::post(&url)
            .send_json(FinishRequest { status })
            .map_err(|err| anyhow::anyhow!("finish request to {url} failed: {err}"))?;

        // 202 is the coordinator's "nothing pending yet" answer.
        if response.status() == 202 {
            return Ok(None);
        }

        let request = response
            .into_json::<RollupRequest>()
            .context("failed to decode pending rollup request")?;
        Ok(Some(request))
    }

    fn send_notice(&mut self, payload: &str) -> Result<(), Self::Error> {
        self.post_output("notice", payload)
    }

    fn send_report(&mut self, payload: &str) -> Result<(), Self::Error> {
        self.post_output("report", payload)
    }
}

// ---------------------------------------------------------------------------
// Scripted transport (for testing)
// ---------------------------------------------------------------------------

/// Scripted coordinator for loop tests: hands out a fixed queue of pending
/// requests and records everything the loop posts back.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedRollup {
    pending: std::collections::VecDeque<Option<RollupRequest>>,
    /// Every status posted to finish, in order.
    pub finishes: Vec<FinishStatus>,
    /// Every notice payload delivered.
    pub notices: Vec<String>,
    /// Every report payload delivered.
    pub reports: Vec<String>,
}

/// Error type for the scripted transport (fires when the script runs dry).
#[cfg(test)]
#[derive(Debug)]
pub struct ScriptError(pub String);

#[cfg(test)]
impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScriptedRollup error: {}", self.0)
    }
}

#[cfg(test)]
impl ScriptedRollup {
    /// Queue a round: a pending request, or `None` to script an idle 202.
    pub fn push_round(&mut self, request: Option<RollupRequest>) {
        self.pending.push_back(request);
    }
}

#[cfg(test)]
impl RollupTransport for ScriptedRollup {
    type Error = ScriptError;

    fn finish(&mut self, status: FinishStatus) -> Result<Option<RollupRequest>, Self::Error> {
        self.finishes.push(status);
        self.pending
            .pop_front()
            .ok_or_else(|| ScriptError("script ran out of rounds".into()))
    }

    fn send_notice(&mut self, payload: &str) -> Result<(), Self::Error> {
        self.notices.push(payload.to_string());
        Ok(())
    }

    fn send_report(&mut self, payload: &str) -> Result<(), Self::Error> {
        self.reports.push(payload.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
