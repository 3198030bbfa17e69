//! Move chain types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a Move account address in bytes.
pub const ADDRESS_LEN: usize = 32;

/// A 32-byte Move account address.
///
/// BCS-serializes as 32 raw bytes; renders as `0x` + 64 hex chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AccountAddress(pub [u8; ADDRESS_LEN]);

impl AccountAddress {
    /// Parse a hex address. Short forms such as `0x1` are left-padded.
    pub fn from_hex(s: &str) -> ChainResult<Self> {
        let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
        if digits.is_empty() || digits.len() > ADDRESS_LEN * 2 {
            return Err(ChainError::InvalidAddress(s.to_string()));
        }

        let padded = format!("{:0>width$}", digits, width = ADDRESS_LEN * 2);
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| ChainError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::str::FromStr for AccountAddress {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Errors that can occur talking to a Move chain node.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport-level failure.
    #[error("Node request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Node answered with a non-success status.
    #[error("Node returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Node answered 404 for the requested object.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Node answered with something we could not interpret.
    #[error("Unexpected node response: {0}")]
    Decode(String),

    /// Address string could not be parsed.
    #[error("Invalid account address: {0}")]
    InvalidAddress(String),

    /// Transaction encoding failed.
    #[error("BCS encoding failed: {0}")]
    Bcs(#[from] bcs::Error),

    /// Transaction committed but the VM rejected it.
    #[error("Transaction {hash} failed: {vm_status}")]
    Aborted { hash: String, vm_status: String },

    /// Node call exceeded the configured timeout.
    #[error("Node request timed out after {0} seconds")]
    Timeout(u64),

    /// Transaction did not commit within the wait deadline.
    #[error("Transaction {hash} not committed after {secs} seconds")]
    WaitTimeout { hash: String, secs: u64 },
}

/// Result type for Move chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Outcome of ensuring the per-account entity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// The list was already on chain; no transaction was sent.
    Existing,
    /// The list was created by the transaction with this hash.
    Created(String),
}

impl ListStatus {
    pub fn created_hash(&self) -> Option<&str> {
        match self {
            ListStatus::Existing => None,
            ListStatus::Created(hash) => Some(hash),
        }
    }
}

/// One entry read back from an account's entity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Position in the account's list, starting at 1.
    #[serde(default, alias = "entry_id", deserialize_with = "de::u64_from_str_or_num_opt")]
    pub id: Option<u64>,
    /// IPFS content reference.
    #[serde(alias = "ipfscontent", alias = "ipfs_content")]
    pub content: String,
    #[serde(deserialize_with = "de::u64_from_str_or_num")]
    pub timestamp: u64,
    /// Owning account.
    #[serde(alias = "owner")]
    pub address: String,
}

/// Serde helpers for Move JSON, which renders u64 values as strings.
pub mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNum {
        Num(u64),
        Str(String),
    }

    fn parse<E: serde::de::Error>(value: StrOrNum) -> Result<u64, E> {
        match value {
            StrOrNum::Num(n) => Ok(n),
            StrOrNum::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected unsigned integer, got {:?}", s))),
        }
    }

    pub fn u64_from_str_or_num<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        parse(StrOrNum::deserialize(deserializer)?)
    }

    pub fn u64_from_str_or_num_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<StrOrNum>::deserialize(deserializer)?
            .map(parse::<D::Error>)
            .transpose()
    }

    /// Interpret a JSON value (number or decimal string) as u64.
    pub fn u64_from_value(value: &serde_json::Value) -> Option<u64> {
        match value {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
