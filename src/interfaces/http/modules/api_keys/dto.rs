//! API Key DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{CreatedApiKey, UsageSummary};
use crate::domain::ApiKey;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"name": "odia-agent"}))]
pub struct CreateApiKeyRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}

/// Stored key as shown to admins; never carries the hash or plaintext.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyDto {
    pub id: String,
    pub name: String,
    pub prefix: String,
    pub enabled: bool,
    pub created_at: String,
    pub last_used_at: Option<String>,
    pub usage_count: i64,
    pub characters_used: i64,
}

impl From<ApiKey> for ApiKeyDto {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            prefix: key.prefix,
            enabled: key.enabled,
            created_at: key.created_at.to_rfc3339(),
            last_used_at: key.last_used_at.map(|t| t.to_rfc3339()),
            usage_count: key.usage_count,
            characters_used: key.characters_used,
        }
    }
}

/// Returned once, at creation. `api_key` cannot be recovered later.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedApiKeyResponse {
    pub id: String,
    pub name: String,
    pub prefix: String,
    pub api_key: String,
    pub created_at: String,
}

impl From<CreatedApiKey> for CreatedApiKeyResponse {
    fn from(created: CreatedApiKey) -> Self {
        Self {
            id: created.key.id,
            name: created.key.name,
            prefix: created.key.prefix,
            api_key: created.plaintext,
            created_at: created.key.created_at.to_rfc3339(),
        }
    }
}

/// Usage totals across all keys
#[derive(Debug, Serialize, ToSchema)]
pub struct UsageStatsDto {
    pub total_keys: usize,
    pub enabled_keys: usize,
    pub total_requests: i64,
    pub total_characters: i64,
}

impl From<UsageSummary> for UsageStatsDto {
    fn from(s: UsageSummary) -> Self {
        Self {
            total_keys: s.total_keys,
            enabled_keys: s.enabled_keys,
            total_requests: s.total_requests,
            total_characters: s.total_characters,
        }
    }
}
