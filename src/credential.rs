//! Private-key normalization.
//!
//! Every write endpoint receives a raw private key in its JSON body. This
//! module turns that string into a [`Credential`], the only form in which key
//! material travels through the relay. Chain modules derive their signing
//! identities from it (`move_chain::LocalAccount`, `evm::Wallet`).
//!
//! # Security
//! - Credentials are never logged, serialized, or persisted
//! - `Debug` output is redacted
//! - Accepting keys over HTTP is a compatibility surface, not a recommendation

use crate::error::{RelayError, RelayResult};

/// Length of a raw private key in bytes.
pub const CREDENTIAL_LEN: usize = 32;

/// A validated 32-byte private key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential([u8; CREDENTIAL_LEN]);

impl Credential {
    /// Parse a hex-encoded private key (with or without 0x prefix).
    pub fn from_hex(private_key_hex: &str) -> RelayResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let bytes = hex::decode(key_hex).map_err(|e| {
            RelayError::InvalidCredential(format!("Private key is not valid hex: {}", e))
        })?;

        let bytes: [u8; CREDENTIAL_LEN] = bytes.as_slice().try_into().map_err(|_| {
            RelayError::InvalidCredential(format!(
                "Private key must be {} bytes long, got {}.",
                CREDENTIAL_LEN,
                bytes.len()
            ))
        })?;

        Ok(Self(bytes))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; CREDENTIAL_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
