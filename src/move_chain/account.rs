//! Move chain signing identity.
//!
//! An ed25519 key pair plus the account address it authenticates. The
//! address is the single-signer authentication key:
//! `sha3_256(public_key || 0x00)`.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use sha3::{Digest, Sha3_256};

use crate::credential::Credential;
use crate::move_chain::types::AccountAddress;

/// Authentication scheme byte for single-key ed25519 accounts.
const ED25519_SCHEME: u8 = 0x00;

/// A signing account derived from a request credential.
pub struct LocalAccount {
    signing_key: SigningKey,
    address: AccountAddress,
}

impl LocalAccount {
    /// Derive the account controlled by `credential`.
    pub fn from_credential(credential: &Credential) -> Self {
        let signing_key = SigningKey::from_bytes(credential.as_bytes());
        let address = derive_address(&signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign an already-prefixed signing message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

impl std::fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address.to_string())
            .finish()
    }
}

/// Address authenticated by a single ed25519 public key.
pub fn derive_address(public_key: &VerifyingKey) -> AccountAddress {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key.as_bytes());
    hasher.update([ED25519_SCHEME]);
    AccountAddress(hasher.finalize().into())
}
