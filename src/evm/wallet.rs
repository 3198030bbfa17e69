//! Per-request EVM signing identity.
//!
//! # Security
//! - Keys come from the request credential and live only as long as the request
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::credential::Credential;
use crate::evm::types::{EvmError, EvmResult};

/// Signer bound to a chain id for EIP-155 replay protection.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a normalized credential.
    ///
    /// Fails when the bytes are not a valid secp256k1 scalar (zero, or not
    /// below the curve order).
    pub fn from_credential(credential: &Credential, chain_id: u64) -> EvmResult<Self> {
        let signer = PrivateKeySigner::from_bytes(&B256::from(*credential.as_bytes()))
            .map_err(|e| EvmError::Wallet(format!("Invalid private key: {}", e)))?
            .with_chain_id(Some(chain_id));

        tracing::debug!(address = %signer.address(), chain_id, "EVM wallet derived");

        Ok(Self { signer, chain_id })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Network wallet for a signing provider.
    pub fn into_network_wallet(self) -> EthereumWallet {
        EthereumWallet::from(self.signer)
    }
}
