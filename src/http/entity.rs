//! EVM endpoints.

use alloy::primitives::Address;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::credential::Credential;
use crate::error::{RelayError, RelayResult};
use crate::evm::{EvmEntity, EvmError};
use crate::http::request::{parse_body, required};
use crate::http::response::{finish, ApiError};
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntityRequest {
    pub data_uri: Option<String>,
    pub private_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntityResponse {
    pub transaction_hash: String,
}

/// POST /addEntity
pub async fn add_entity(
    State(state): State<AppState>,
    payload: Result<Json<AddEntityRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = add_entity_inner(&state, payload)
        .await
        .map_err(|e| ApiError::new("Error adding entity", e));
    finish("add_entity", start, result)
}

async fn add_entity_inner(
    state: &AppState,
    payload: Result<Json<AddEntityRequest>, JsonRejection>,
) -> RelayResult<Json<AddEntityResponse>> {
    let registry = state.entity_relay()?;
    let request = parse_body(payload)?;
    let data_uri = required(request.data_uri, "dataUri")?;
    let credential = Credential::from_hex(&required(request.private_key, "privateKey")?)?;

    let tx_hash = registry
        .add_entity(&credential, &data_uri)
        .await
        .map_err(|e| match e {
            EvmError::Wallet(msg) => RelayError::InvalidCredential(msg),
            other => RelayError::TransactionFailed(other.to_string()),
        })?;

    Ok(Json(AddEntityResponse {
        transaction_hash: tx_hash.to_string(),
    }))
}

/// GET /entities/{address}
pub async fn list_entities(State(state): State<AppState>, Path(address): Path<String>) -> Response {
    let start = Instant::now();
    let result = list_entities_inner(&state, &address)
        .await
        .map_err(|e| ApiError::new("Error fetching entities", e));
    finish("list_entities", start, result)
}

async fn list_entities_inner(state: &AppState, address: &str) -> RelayResult<Json<Vec<EvmEntity>>> {
    let registry = state.entity_relay()?;
    let user: Address = address
        .parse()
        .map_err(|e| RelayError::InvalidRequest(format!("Invalid address '{}': {}", address, e)))?;

    let entities = registry
        .entities_of(user)
        .await
        .map_err(|e| RelayError::Query(e.to_string()))?;
    Ok(Json(entities))
}
