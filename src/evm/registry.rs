//! EntityRegistry contract binding.
//!
//! # Responsibilities
//! - Send `addEntity(string)` signed by the request's wallet
//! - Wait for the receipt with the configured confirmations
//! - Read a user's entities through the `getEntitiesByUser` view

use alloy::primitives::{Address, TxHash};
use alloy::sol;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

use crate::credential::Credential;
use crate::evm::client::EvmClient;
use crate::evm::types::{EvmEntity, EvmError, EvmResult};
use crate::evm::wallet::Wallet;
use crate::observability::metrics;

sol! {
    #[sol(rpc)]
    contract EntityRegistry {
        struct Entity {
            uint256 id;
            address user;
            string dataUri;
            uint256 timestamp;
        }

        /// Emitted for every stored entity.
        #[derive(Debug)]
        event EntityAdded(uint256 indexed id, address indexed user, string dataUri, uint256 timestamp);

        function addEntity(string dataUri) external;

        function getEntitiesByUser(address user) external view returns (Entity[] memory);
    }
}

impl From<EntityRegistry::Entity> for EvmEntity {
    fn from(entity: EntityRegistry::Entity) -> Self {
        Self {
            id: entity.id.saturating_to::<u64>(),
            user: entity.user,
            data_uri: entity.dataUri,
            timestamp: entity.timestamp.saturating_to::<u64>(),
        }
    }
}

/// Operations the relay needs from the EVM entity contract.
#[async_trait]
pub trait EntityRelay: Send + Sync {
    /// Store `data_uri` as an entity owned by the credential's address.
    /// Returns the mined transaction hash.
    async fn add_entity(&self, credential: &Credential, data_uri: &str) -> EvmResult<TxHash>;

    /// Entities stored for `user`, in contract order.
    async fn entities_of(&self, user: Address) -> EvmResult<Vec<EvmEntity>>;

    async fn is_healthy(&self) -> bool;
}

/// Registry contract at a configured address.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: EvmClient,
    contract_address: Address,
}

impl RegistryClient {
    pub fn new(client: EvmClient) -> EvmResult<Self> {
        let contract_address: Address = client
            .config()
            .contract_address
            .parse()
            .map_err(|e| EvmError::InvalidAddress(format!("contract address: {}", e)))?;

        tracing::info!(contract = %contract_address, "Entity registry bound");
        Ok(Self {
            client,
            contract_address,
        })
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }
}

#[async_trait]
impl EntityRelay for RegistryClient {
    async fn add_entity(&self, credential: &Credential, data_uri: &str) -> EvmResult<TxHash> {
        let config = self.client.config();
        let wallet = Wallet::from_credential(credential, config.chain_id)?;
        let sender = wallet.address();
        let contract = EntityRegistry::new(self.contract_address, self.client.signing_provider(wallet));

        let call = contract.addEntity(data_uri.to_string());
        let pending = match timeout(self.client.timeout_duration(), call.send()).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => {
                metrics::record_transaction("evm", "addEntity", false);
                return Err(EvmError::Contract(e.to_string()));
            }
            Err(_) => {
                metrics::record_transaction("evm", "addEntity", false);
                return Err(EvmError::Timeout(config.rpc_timeout_secs));
            }
        };
        let tx_hash = *pending.tx_hash();
        tracing::info!(sender = %sender, tx_hash = %tx_hash, "addEntity submitted");

        let receipt = pending
            .with_required_confirmations(config.confirmation_blocks)
            .with_timeout(Some(Duration::from_secs(config.receipt_timeout_secs)))
            .get_receipt()
            .await
            .map_err(|e| {
                metrics::record_transaction("evm", "addEntity", false);
                EvmError::Rpc(e.to_string())
            })?;

        if !receipt.status() {
            metrics::record_transaction("evm", "addEntity", false);
            return Err(EvmError::Reverted(tx_hash.to_string()));
        }

        metrics::record_transaction("evm", "addEntity", true);
        tracing::info!(
            tx_hash = %tx_hash,
            block_number = receipt.block_number.unwrap_or_default(),
            "addEntity mined"
        );
        Ok(tx_hash)
    }

    async fn entities_of(&self, user: Address) -> EvmResult<Vec<EvmEntity>> {
        let contract = EntityRegistry::new(self.contract_address, self.client.provider().clone());
        let call = contract.getEntitiesByUser(user);
        let entities = match timeout(self.client.timeout_duration(), call.call()).await {
            Ok(Ok(entities)) => entities,
            Ok(Err(e)) => return Err(EvmError::Contract(e.to_string())),
            Err(_) => return Err(EvmError::Timeout(self.client.config().rpc_timeout_secs)),
        };
        Ok(entities.into_iter().map(EvmEntity::from).collect())
    }

    async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{keccak256, U256};
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn test_add_entity_selector() {
        let hash = keccak256("addEntity(string)");
        let expected = &hash[..4];
        assert_eq!(EntityRegistry::addEntityCall::SELECTOR.as_slice(), expected);

        let data = EntityRegistry::addEntityCall {
            dataUri: "ipfs://abc".to_string(),
        }
        .abi_encode();
        assert_eq!(&data[..4], expected);
    }

    #[test]
    fn test_event_signature() {
        assert_eq!(
            EntityRegistry::EntityAdded::SIGNATURE,
            "EntityAdded(uint256,address,string,uint256)"
        );
    }

    #[test]
    fn test_entity_conversion() {
        let entity = EntityRegistry::Entity {
            id: U256::from(3),
            user: Address::repeat_byte(0x11),
            dataUri: "ipfs://abc".to_string(),
            timestamp: U256::from(1_700_000_000u64),
        };
        let converted = EvmEntity::from(entity);
        assert_eq!(converted.id, 3);
        assert_eq!(converted.user, Address::repeat_byte(0x11));
        assert_eq!(converted.data_uri, "ipfs://abc");
        assert_eq!(converted.timestamp, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_bad_contract_address() {
        let client = EvmClient::new(crate::config::EvmConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            contract_address: "0x1234".to_string(),
            rpc_timeout_secs: 1,
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(matches!(RegistryClient::new(client), Err(EvmError::InvalidAddress(_))));
    }
}
