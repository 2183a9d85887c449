use std::fmt;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::rng::sha256_hex;

/// Raw seed length in bytes; its hex form is twice as long.
pub const SEED_BYTES: usize = 32;

/// Secret server seed, kept hidden until the round it drives has resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSeed(String);

impl ServerSeed {
    /// Draws a fresh seed from a cryptographically secure source.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SEED_BYTES];
        rng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accepts a previously revealed seed: 64 hex characters.
    pub fn from_hex(hex: impl Into<String>) -> EngineResult<Self> {
        let hex = hex.into();
        if hex.len() != SEED_BYTES * 2 {
            return Err(EngineError::InvalidSeed(format!(
                "expected {} hex characters, got {}",
                SEED_BYTES * 2,
                hex.len()
            )));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EngineError::InvalidSeed("non-hex character".into()));
        }
        Ok(Self(hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn commitment(&self) -> SeedCommitment {
        SeedCommitment(sha256_hex(self.0.as_bytes()))
    }
}

impl fmt::Debug for ServerSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSeed(<redacted>)")
    }
}

/// Published SHA-256 hash of a [`ServerSeed`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedCommitment(String);

impl SeedCommitment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeedCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of checking a revealed seed against its commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    Verified,
    CommitmentMismatch,
    OutcomeMismatch,
}

impl Verification {
    pub fn is_verified(self) -> bool {
        matches!(self, Verification::Verified)
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Verified => f.write_str("fairness check passed"),
            Verification::CommitmentMismatch => {
                f.write_str("fairness check failed: seed does not match published hash")
            }
            Verification::OutcomeMismatch => {
                f.write_str("fairness check failed: outcome does not match revealed seed")
            }
        }
    }
}

/// Recomputes `sha256(seed)` and compares it to the published hash exactly.
pub fn verify_result(seed: &str, published_hash: &str) -> bool {
    let matches = sha256_hex(seed.as_bytes()) == published_hash;
    if !matches {
        warn!(published_hash, "seed does not match commitment");
    }
    matches
}
