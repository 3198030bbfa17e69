//! Transaction building and signing for the Move chain.
//!
//! # Responsibilities
//! - Describe an entry-function call with BCS-encoded arguments
//! - Assemble the raw transaction (sender, sequence number, gas, expiry)
//! - Produce the signing message and the signed BCS envelope for submission
//!
//! Field order of every struct here is the wire order; do not reorder.

use serde::{Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::move_chain::account::LocalAccount;
use crate::move_chain::types::{AccountAddress, ChainResult};

/// Domain separator hashed in front of every signed raw transaction.
const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";

/// `TransactionPayload::EntryFunction` variant index.
const ENTRY_FUNCTION_VARIANT: u32 = 2;

/// `module_address::module_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: String,
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

/// Primitive type arguments for generic entry functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
}

/// A call to a public entry function. Arguments are individually
/// BCS-encoded values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFunction {
    pub module: ModuleId,
    pub function: String,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// A call with no type arguments and no value arguments.
    pub fn new(module: ModuleId, function: impl Into<String>) -> Self {
        Self {
            module,
            function: function.into(),
            ty_args: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Append one argument, BCS-encoded.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> ChainResult<Self> {
        self.args.push(bcs::to_bytes(value)?);
        Ok(self)
    }

    /// Fully-qualified function id, e.g. `0x1::module::function`.
    pub fn function_id(&self) -> String {
        format!("{}::{}", self.module, self.function)
    }
}

/// Only entry-function payloads are relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPayload(pub EntryFunction);

impl Serialize for TransactionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_variant(
            "TransactionPayload",
            ENTRY_FUNCTION_VARIANT,
            "EntryFunction",
            &self.0,
        )
    }
}

/// Unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

impl RawTransaction {
    /// `sha3_256(salt) || bcs(self)`; the bytes an ed25519 key signs.
    pub fn signing_message(&self) -> ChainResult<Vec<u8>> {
        let mut message = Sha3_256::digest(RAW_TRANSACTION_SALT).to_vec();
        message.extend(bcs::to_bytes(self)?);
        Ok(message)
    }

    /// Sign with `account` and wrap into a submittable transaction.
    pub fn sign(self, account: &LocalAccount) -> ChainResult<SignedTransaction> {
        let signature = account.sign(&self.signing_message()?);
        Ok(SignedTransaction {
            raw_txn: self,
            authenticator: TransactionAuthenticator::Ed25519 {
                public_key: account.public_key().as_bytes().to_vec(),
                signature: signature.to_bytes().to_vec(),
            },
        })
    }
}

/// Single-signer authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionAuthenticator {
    Ed25519 {
        public_key: Vec<u8>,
        signature: Vec<u8>,
    },
}

/// Signed transaction, submitted as BCS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    pub raw_txn: RawTransaction,
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    pub fn to_bcs(&self) -> ChainResult<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use ed25519_dalek::{Signature, Verifier};

    fn module() -> ModuleId {
        ModuleId {
            address: AccountAddress::from_hex("0xcafe").unwrap(),
            name: "vortexengine".to_string(),
        }
    }

    fn raw(payload: EntryFunction) -> RawTransaction {
        RawTransaction {
            sender: AccountAddress::from_hex("0x1").unwrap(),
            sequence_number: 7,
            payload: TransactionPayload(payload),
            max_gas_amount: 100_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_700_000_600,
            chain_id: 2,
        }
    }

    #[test]
    fn test_function_id() {
        let call = EntryFunction::new(module(), "create_list");
        assert_eq!(
            call.function_id(),
            format!("{}::vortexengine::create_list", AccountAddress::from_hex("0xcafe").unwrap())
        );
    }

    #[test]
    fn test_args_are_bcs_encoded() {
        let call = EntryFunction::new(module(), "create_entry")
            .arg("ipfs://abc")
            .unwrap()
            .arg(&1_700_000_000u64)
            .unwrap();
        // uleb128 length prefix then utf-8 bytes
        assert_eq!(call.args[0][0], 10);
        assert_eq!(&call.args[0][1..], b"ipfs://abc");
        assert_eq!(call.args[1], 1_700_000_000u64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_raw_transaction_layout() {
        let bytes = bcs::to_bytes(&raw(EntryFunction::new(module(), "create_list"))).unwrap();

        // sender: 32 raw bytes, no length prefix
        assert_eq!(bytes[31], 1);
        // sequence number, little endian
        assert_eq!(&bytes[32..40], &7u64.to_le_bytes());
        // payload variant index
        assert_eq!(bytes[40], ENTRY_FUNCTION_VARIANT as u8);
        // module address follows directly
        assert_eq!(bytes[41 + 31], 0xfe);
        // chain id is the final byte
        assert_eq!(*bytes.last().unwrap(), 2);
    }

    #[test]
    fn test_signing_message_prefix() {
        let txn = raw(EntryFunction::new(module(), "create_list"));
        let message = txn.signing_message().unwrap();
        let salt = Sha3_256::digest(RAW_TRANSACTION_SALT);
        assert_eq!(&message[..32], salt.as_slice());
        assert_eq!(&message[32..], bcs::to_bytes(&txn).unwrap().as_slice());
    }

    #[test]
    fn test_signed_transaction_verifies() {
        let credential = Credential::from_hex(&"42".repeat(32)).unwrap();
        let account = LocalAccount::from_credential(&credential);
        let txn = raw(EntryFunction::new(module(), "create_list"));
        let message = txn.signing_message().unwrap();

        let signed = txn.sign(&account).unwrap();
        let TransactionAuthenticator::Ed25519 {
            public_key,
            signature,
        } = &signed.authenticator;
        assert_eq!(public_key.len(), 32);
        assert_eq!(signature.len(), 64);

        let sig = Signature::from_slice(signature).unwrap();
        assert!(account.public_key().verify(&message, &sig).is_ok());

        // authenticator: variant 0, then length-prefixed key and signature
        let bytes = signed.to_bcs().unwrap();
        let tail = &bytes[bytes.len() - (1 + 1 + 32 + 1 + 64)..];
        assert_eq!(tail[0], 0);
        assert_eq!(tail[1], 32);
        assert_eq!(tail[34], 64);
    }
}
