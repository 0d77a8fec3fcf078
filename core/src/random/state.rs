//! Serializable random engine snapshots
//!
//! The binary form is `MAGIC | bincode payload | xxh3-64 checksum (LE)`. Any
//! deviation is rejected outright; there is no partial import.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Leading bytes of the binary snapshot format
pub const STATE_MAGIC: [u8; 4] = *b"DRNG";

/// Current snapshot format version
pub const STATE_VERSION: u8 = 1;

const CHECKSUM_SIZE: usize = 8;

/// Errors from importing a malformed [`RandomEngineState`]
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state snapshot too short ({len} bytes)")]
    Truncated { len: usize },

    #[error("state snapshot has an unrecognized header")]
    BadMagic,

    #[error("unsupported state snapshot version: {0}")]
    UnsupportedVersion(u8),

    #[error("state snapshot checksum mismatch (expected {expected:#018x}, got {actual:#018x})")]
    ChecksumMismatch { expected: u64, actual: u64 },

    #[error("state snapshot holds an invalid PCG stream (even increment)")]
    MalformedStream,

    #[error("failed to decode state snapshot: {0}")]
    Decode(#[from] bincode::Error),

    #[error("failed to parse state snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque snapshot of a [`RandomEngine`](super::RandomEngine) stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomEngineState {
    version: u8,
    rng: Pcg32,
    draws: u64,
}

impl RandomEngineState {
    pub(super) fn new(rng: Pcg32, draws: u64) -> Self {
        Self {
            version: STATE_VERSION,
            rng,
            draws,
        }
    }

    pub(super) fn into_parts(self) -> (Pcg32, u64) {
        (self.rng, self.draws)
    }

    /// Draw count recorded at export time
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Encode to the checksummed binary format
    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        let payload = bincode::serialize(self)?;
        let mut bytes = Vec::with_capacity(STATE_MAGIC.len() + payload.len() + CHECKSUM_SIZE);
        bytes.extend_from_slice(&STATE_MAGIC);
        bytes.extend_from_slice(&payload);
        bytes.extend_from_slice(&xxh3_64(&payload).to_le_bytes());
        Ok(bytes)
    }

    /// Decode the checksummed binary format
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        if bytes.len() < STATE_MAGIC.len() + CHECKSUM_SIZE + 1 {
            return Err(StateError::Truncated { len: bytes.len() });
        }
        let (magic, rest) = bytes.split_at(STATE_MAGIC.len());
        if magic != STATE_MAGIC {
            return Err(StateError::BadMagic);
        }

        let (payload, checksum) = rest.split_at(rest.len() - CHECKSUM_SIZE);
        let mut expected = [0u8; CHECKSUM_SIZE];
        expected.copy_from_slice(checksum);
        let expected = u64::from_le_bytes(expected);
        let actual = xxh3_64(payload);
        if expected != actual {
            return Err(StateError::ChecksumMismatch { expected, actual });
        }

        let state: Self = bincode::deserialize(payload)?;
        state.validate()
    }

    /// Encode as JSON (all 64-bit fields survive as exact integers)
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let state: Self = serde_json::from_str(json)?;
        state.validate()
    }

    fn validate(self) -> Result<Self, StateError> {
        if self.version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion(self.version));
        }
        // A PCG stream increment is always odd
        let rng = serde_json::to_value(&self.rng)?;
        match rng.get("increment").and_then(serde_json::Value::as_u64) {
            Some(increment) if increment % 2 == 1 => Ok(self),
            _ => Err(StateError::MalformedStream),
        }
    }
}
