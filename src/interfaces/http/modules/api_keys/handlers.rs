//! API key handlers (admin bearer required)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{ApiKeyDto, CreateApiKeyRequest, CreatedApiKeyResponse, UsageStatsDto};
use crate::application::KeyManager;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::shared::GatewayError;

#[derive(Clone)]
pub struct ApiKeyHandlerState {
    pub keys: Arc<KeyManager>,
}

#[utoipa::path(
    post,
    path = "/create-api-key",
    tag = "API Keys",
    request_body = CreateApiKeyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Key created; the plaintext is shown only here", body = CreatedApiKeyResponse),
        (status = 400, description = "Invalid name"),
        (status = 401, description = "Missing admin bearer"),
        (status = 403, description = "Wrong admin bearer or admin disabled")
    )
)]
pub async fn create_api_key(
    State(state): State<ApiKeyHandlerState>,
    ValidatedJson(req): ValidatedJson<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<CreatedApiKeyResponse>), GatewayError> {
    let created = state.keys.create_key(&req.name).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/admin/api-keys",
    tag = "API Keys",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All keys, newest first", body = ApiResponse<Vec<ApiKeyDto>>),
        (status = 401, description = "Missing admin bearer"),
        (status = 403, description = "Wrong admin bearer or admin disabled")
    )
)]
pub async fn list_api_keys(
    State(state): State<ApiKeyHandlerState>,
) -> Result<Json<ApiResponse<Vec<ApiKeyDto>>>, GatewayError> {
    let keys = state.keys.list_keys().await?;
    Ok(Json(ApiResponse::success(
        keys.into_iter().map(ApiKeyDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/admin/api-keys/{id}/disable",
    tag = "API Keys",
    params(("id" = String, Path, description = "API key id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Key disabled", body = ApiResponse<ApiKeyDto>),
        (status = 404, description = "Unknown key id")
    )
)]
pub async fn disable_api_key(
    State(state): State<ApiKeyHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ApiKeyDto>>, GatewayError> {
    let key = state.keys.set_enabled(&id, false).await?;
    Ok(Json(ApiResponse::success(key.into())))
}

#[utoipa::path(
    post,
    path = "/admin/api-keys/{id}/enable",
    tag = "API Keys",
    params(("id" = String, Path, description = "API key id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Key enabled", body = ApiResponse<ApiKeyDto>),
        (status = 404, description = "Unknown key id")
    )
)]
pub async fn enable_api_key(
    State(state): State<ApiKeyHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ApiKeyDto>>, GatewayError> {
    let key = state.keys.set_enabled(&id, true).await?;
    Ok(Json(ApiResponse::success(key.into())))
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "API Keys",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Usage totals across all keys", body = ApiResponse<UsageStatsDto>),
        (status = 401, description = "Missing admin bearer"),
        (status = 403, description = "Wrong admin bearer or admin disabled")
    )
)]
pub async fn usage_stats(
    State(state): State<ApiKeyHandlerState>,
) -> Result<Json<ApiResponse<UsageStatsDto>>, GatewayError> {
    let summary = state.keys.usage_summary().await?;
    Ok(Json(ApiResponse::success(summary.into())))
}
