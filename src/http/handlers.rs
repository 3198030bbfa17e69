//! Move chain endpoints.
//!
//! Each handler parses its body, derives the signing account from the
//! request credential, runs one [`EntryService`] operation, and answers with
//! the committed transaction hash.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::credential::Credential;
use crate::error::{RelayError, RelayResult};
use crate::http::request::{parse_body, required};
use crate::http::response::{finish, ApiError};
use crate::http::server::AppState;
use crate::move_chain::types::de;
use crate::move_chain::{AccountAddress, Entry, LocalAccount};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub private_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub ipfscontent: Option<String>,
    /// Number or decimal string.
    #[serde(default, deserialize_with = "de::u64_from_str_or_num_opt")]
    pub timestamp: Option<u64>,
    pub private_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesRequest {
    pub account_address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub message: &'static str,
    pub hash: String,
    /// Hash of the list-creation transaction sent first, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_hash: Option<String>,
}

/// POST /api/create-list
pub async fn create_list(
    State(state): State<AppState>,
    payload: Result<Json<CreateListRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = create_list_inner(&state, payload)
        .await
        .map_err(|e| ApiError::new("Error creating list", e));
    finish("create_list", start, result)
}

async fn create_list_inner(
    state: &AppState,
    payload: Result<Json<CreateListRequest>, JsonRejection>,
) -> RelayResult<Json<TransactionResponse>> {
    let service = state.entry_service()?;
    let request = parse_body(payload)?;
    let credential = Credential::from_hex(&required(request.private_key, "privateKey")?)?;
    let account = LocalAccount::from_credential(&credential);

    tracing::info!(account = %account.address(), "create-list requested");
    let hash = service.create_list(&account).await?;

    Ok(Json(TransactionResponse {
        message: "List created successfully",
        hash,
        list_hash: None,
    }))
}

/// POST /api/create-entry
pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = create_entry_inner(&state, payload)
        .await
        .map_err(|e| ApiError::new("Error creating entry", e));
    finish("create_entry", start, result)
}

async fn create_entry_inner(
    state: &AppState,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> RelayResult<Json<TransactionResponse>> {
    let service = state.entry_service()?;
    let request = parse_body(payload)?;
    let content = required(request.ipfscontent, "ipfscontent")?;
    let timestamp = request.timestamp.ok_or(RelayError::MissingField("timestamp"))?;
    let credential = Credential::from_hex(&required(request.private_key, "privateKey")?)?;
    let account = LocalAccount::from_credential(&credential);

    tracing::info!(account = %account.address(), timestamp, "create-entry requested");
    let (list, hash) = service.create_entry(&account, &content, timestamp).await?;

    Ok(Json(TransactionResponse {
        message: "Entry created successfully",
        hash,
        list_hash: list.created_hash().map(str::to_string),
    }))
}

/// POST /api/get-function-value
pub async fn list_entries(
    State(state): State<AppState>,
    payload: Result<Json<ListEntriesRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = list_entries_inner(&state, payload)
        .await
        .map_err(|e| ApiError::new("Error fetching entries", e));
    finish("get_function_value", start, result)
}

async fn list_entries_inner(
    state: &AppState,
    payload: Result<Json<ListEntriesRequest>, JsonRejection>,
) -> RelayResult<Json<Vec<Entry>>> {
    let service = state.entry_service()?;
    let request = parse_body(payload)?;
    let address = required(request.account_address, "accountAddress")?;
    let address = AccountAddress::from_hex(&address)
        .map_err(|e| RelayError::InvalidRequest(e.to_string()))?;

    Ok(Json(service.list_entries(address).await?))
}
