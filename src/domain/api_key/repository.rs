//! Key store interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::ApiKey;
use crate::shared::GatewayResult;

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Persist a new record. A duplicate `key_hash` is a `Conflict`.
    async fn insert(&self, key: ApiKey) -> GatewayResult<ApiKey>;
    async fn find_by_hash(&self, key_hash: &str) -> GatewayResult<Option<ApiKey>>;
    async fn find_by_id(&self, id: &str) -> GatewayResult<Option<ApiKey>>;
    /// All records, newest first.
    async fn list(&self) -> GatewayResult<Vec<ApiKey>>;
    /// Returns `None` if no record has this id.
    async fn set_enabled(&self, id: &str, enabled: bool) -> GatewayResult<Option<ApiKey>>;
    async fn touch_last_used(&self, id: &str, at: DateTime<Utc>) -> GatewayResult<()>;
    /// Count one served request of `characters` characters against the key.
    async fn record_usage(&self, id: &str, characters: i64) -> GatewayResult<()>;
    /// Cheap liveness check for the health endpoint.
    async fn ping(&self) -> GatewayResult<()>;
}
