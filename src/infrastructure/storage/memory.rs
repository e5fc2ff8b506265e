//! In-memory key store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{ApiKey, ApiKeyRepository};
use crate::shared::{GatewayError, GatewayResult};

/// In-memory key store for development and testing.
///
/// Records are keyed by hash; `ids` maps id -> hash.
pub struct InMemoryApiKeyRepository {
    by_hash: DashMap<String, ApiKey>,
    ids: DashMap<String, String>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self {
            by_hash: DashMap::new(),
            ids: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }
}

impl Default for InMemoryApiKeyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn insert(&self, key: ApiKey) -> GatewayResult<ApiKey> {
        match self.by_hash.entry(key.key_hash.clone()) {
            Entry::Occupied(_) => Err(GatewayError::Conflict(
                "api key hash already exists".to_string(),
            )),
            Entry::Vacant(slot) => {
                self.ids.insert(key.id.clone(), key.key_hash.clone());
                slot.insert(key.clone());
                Ok(key)
            }
        }
    }

    async fn find_by_hash(&self, key_hash: &str) -> GatewayResult<Option<ApiKey>> {
        Ok(self.by_hash.get(key_hash).map(|k| k.clone()))
    }

    async fn find_by_id(&self, id: &str) -> GatewayResult<Option<ApiKey>> {
        let Some(hash) = self.ids.get(id).map(|h| h.clone()) else {
            return Ok(None);
        };
        Ok(self.by_hash.get(&hash).map(|k| k.clone()))
    }

    async fn list(&self) -> GatewayResult<Vec<ApiKey>> {
        let mut keys: Vec<ApiKey> = self.by_hash.iter().map(|k| k.clone()).collect();
        keys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(keys)
    }

    async fn set_enabled(&self, id: &str, enabled: bool) -> GatewayResult<Option<ApiKey>> {
        let Some(hash) = self.ids.get(id).map(|h| h.clone()) else {
            return Ok(None);
        };
        Ok(self.by_hash.get_mut(&hash).map(|mut k| {
            k.enabled = enabled;
            k.clone()
        }))
    }

    async fn touch_last_used(&self, id: &str, at: DateTime<Utc>) -> GatewayResult<()> {
        if let Some(hash) = self.ids.get(id).map(|h| h.clone()) {
            if let Some(mut k) = self.by_hash.get_mut(&hash) {
                k.last_used_at = Some(at);
            }
        }
        Ok(())
    }

    async fn record_usage(&self, id: &str, characters: i64) -> GatewayResult<()> {
        if let Some(hash) = self.ids.get(id).map(|h| h.clone()) {
            if let Some(mut k) = self.by_hash.get_mut(&hash) {
                k.usage_count += 1;
                k.characters_used += characters;
            }
        }
        Ok(())
    }

    async fn ping(&self) -> GatewayResult<()> {
        Ok(())
    }
}
