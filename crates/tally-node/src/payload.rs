//! Hex payload codec for the coordinator wire format.
//!
//! Every payload crossing the coordinator boundary is UTF-8 text carried
//! as a `0x`-prefixed hex string. Outbound messages go through [`encode`];
//! inbound request payloads come back through [`decode`].

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a wire payload could not be decoded to text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The payload did not start with `0x`.
    #[error("payload is missing the 0x prefix")]
    MissingPrefix,

    /// The characters after the prefix were not valid hex.
    #[error("payload is not valid hex: {detail}")]
    InvalidHex { detail: String },

    /// The decoded bytes were not UTF-8 text.
    #[error("payload is not valid UTF-8: {detail}")]
    InvalidUtf8 { detail: String },
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encode text as a `0x`-prefixed lowercase hex payload.
#[must_use]
pub fn encode(text: &str) -> String {
    format!("0x{}", hex::encode(text))
}

/// Decode a `0x`-prefixed hex payload back to text.
///
/// # Errors
///
/// Returns an error if the prefix is missing, the digits are not valid
/// hex, or the decoded bytes are not UTF-8.
pub fn decode(payload: &str) -> Result<String, PayloadError> {
    let digits = payload.strip_prefix("0x").ok_or(PayloadError::MissingPrefix)?;
    let bytes = hex::decode(digits).map_err(|err| PayloadError::InvalidHex {
        detail: err.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|err| PayloadError::InvalidUtf8 {
        detail: err.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
