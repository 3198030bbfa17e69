use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub message: String,
    pub hash: String,
    #[serde(default)]
    pub list_hash: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<u64>,
    pub content: String,
    pub timestamp: u64,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntityResponse {
    pub transaction_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmEntity {
    pub id: u64,
    pub user: String,
    pub data_uri: String,
    pub timestamp: u64,
}

pub struct RelayClient {
    client: Client,
    relay_url: String,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create the entry list for the key's account.
    pub async fn create_list(
        &self,
        private_key: &str,
    ) -> Result<TransactionResponse, Box<dyn std::error::Error>> {
        let body = serde_json::json!({ "privateKey": private_key });
        self.post("/api/create-list", &body).await
    }

    /// Append an entry, creating the list first when the account has none.
    pub async fn create_entry(
        &self,
        private_key: &str,
        content: &str,
        timestamp: u64,
    ) -> Result<TransactionResponse, Box<dyn std::error::Error>> {
        let body = serde_json::json!({
            "ipfscontent": content,
            "timestamp": timestamp,
            "privateKey": private_key,
        });
        self.post("/api/create-entry", &body).await
    }

    /// All entries of an account, in index order.
    pub async fn entries(&self, account_address: &str) -> Result<Vec<Entry>, Box<dyn std::error::Error>> {
        let body = serde_json::json!({ "accountAddress": account_address });
        self.post("/api/get-function-value", &body).await
    }

    /// Register an entity on the EVM registry.
    pub async fn add_entity(
        &self,
        private_key: &str,
        data_uri: &str,
    ) -> Result<AddEntityResponse, Box<dyn std::error::Error>> {
        let body = serde_json::json!({ "dataUri": data_uri, "privateKey": private_key });
        self.post("/addEntity", &body).await
    }

    pub async fn entities(&self, user: &str) -> Result<Vec<EvmEntity>, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/entities/{}", self.relay_url, user))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn health(&self) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.relay_url))
            .send()
            .await?;
        decode(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(format!("{}{}", self.relay_url, path))
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, Box<dyn std::error::Error>> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(format!("Relay returned error status {}: {}", status, text).into());
    }

    Ok(serde_json::from_str::<T>(&text)?)
}
