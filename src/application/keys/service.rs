//! API key service: application-layer orchestration
//!
//! Minting, validation and the enable/disable toggle live here. HTTP
//! handlers and middleware are thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::SecurityConfig;
use crate::domain::{ApiKey, ApiKeyRepository};
use crate::infrastructure::crypto::{
    constant_time_equal, generate_api_key, is_api_key_format, KeyHasher,
};
use crate::shared::{GatewayError, GatewayResult};

/// Longest accepted key name, in characters
pub const MAX_KEY_NAME_LEN: usize = 100;

/// A freshly minted key. `plaintext` exists only in this value.
#[derive(Debug, Clone)]
pub struct CreatedApiKey {
    pub key: ApiKey,
    pub plaintext: String,
}

/// Totals across every stored key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageSummary {
    pub total_keys: usize,
    pub enabled_keys: usize,
    pub total_requests: i64,
    pub total_characters: i64,
}

pub struct KeyManager {
    repo: Arc<dyn ApiKeyRepository>,
    /// `Err` holds the configuration problem that prevents hashing.
    hasher: Result<KeyHasher, String>,
}

impl KeyManager {
    pub fn new(repo: Arc<dyn ApiKeyRepository>, security: &SecurityConfig) -> Self {
        let hasher = KeyHasher::new(&security.secret_key, &security.key_pepper).map_err(|e| match e {
            GatewayError::Config(msg) => msg,
            other => other.to_string(),
        });
        Self { repo, hasher }
    }

    fn hasher(&self) -> GatewayResult<&KeyHasher> {
        self.hasher
            .as_ref()
            .map_err(|msg| GatewayError::Config(msg.clone()))
    }

    /// Mint and persist a key named `name`. The plaintext is returned once.
    pub async fn create_key(&self, name: &str) -> GatewayResult<CreatedApiKey> {
        let hasher = self.hasher()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(GatewayError::Validation("name is required".to_string()));
        }
        if name.chars().count() > MAX_KEY_NAME_LEN {
            return Err(GatewayError::Validation(format!(
                "name must be at most {} characters",
                MAX_KEY_NAME_LEN
            )));
        }

        let generated = generate_api_key();
        let key_hash = hasher.hash(&generated.plaintext)?;
        let key = self
            .repo
            .insert(ApiKey::new(name, generated.display_prefix, key_hash))
            .await?;

        metrics::counter!("api_keys_created_total").increment(1);
        info!(key_id = %key.id, prefix = %key.prefix, "API key created");

        Ok(CreatedApiKey {
            key,
            plaintext: generated.plaintext,
        })
    }

    /// Return the enabled record matching `presented`, or `None`.
    pub async fn validate_key(&self, presented: &str) -> GatewayResult<Option<ApiKey>> {
        let hasher = self.hasher()?;

        if !is_api_key_format(presented) {
            record_validation("malformed");
            return Ok(None);
        }

        let computed = hasher.hash(presented)?;
        let Some(key) = self.repo.find_by_hash(&computed).await? else {
            record_validation("unknown");
            return Ok(None);
        };

        if !constant_time_equal(&key.key_hash, &computed) {
            record_validation("unknown");
            return Ok(None);
        }

        if !key.enabled {
            debug!(key_id = %key.id, "Rejected disabled API key");
            record_validation("disabled");
            return Ok(None);
        }

        record_validation("accepted");
        self.spawn_touch(&key.id);
        Ok(Some(key))
    }

    pub async fn list_keys(&self) -> GatewayResult<Vec<ApiKey>> {
        self.repo.list().await
    }

    /// Toggle `enabled`; the only mutation a stored key ever sees.
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> GatewayResult<ApiKey> {
        let key = self
            .repo
            .set_enabled(id, enabled)
            .await?
            .ok_or_else(|| GatewayError::NotFound {
                entity: "api_key",
                field: "id",
                value: id.to_string(),
            })?;
        info!(key_id = %key.id, enabled, "API key toggled");
        Ok(key)
    }

    /// Count a served speak request against `id`. Failures are logged only;
    /// accounting never fails the request it describes.
    pub async fn record_usage(&self, id: &str, characters: usize) {
        let characters = i64::try_from(characters).unwrap_or(i64::MAX);
        if let Err(e) = self.repo.record_usage(id, characters).await {
            warn!(key_id = %id, "Failed to record API key usage: {}", e);
        }
    }

    pub async fn usage_summary(&self) -> GatewayResult<UsageSummary> {
        let keys = self.repo.list().await?;
        Ok(keys.iter().fold(UsageSummary::default(), |mut acc, key| {
            acc.total_keys += 1;
            if key.enabled {
                acc.enabled_keys += 1;
            }
            acc.total_requests += key.usage_count;
            acc.total_characters += key.characters_used;
            acc
        }))
    }

    pub async fn ping_store(&self) -> GatewayResult<()> {
        self.repo.ping().await
    }

    // Update last used timestamp (fire and forget)
    fn spawn_touch(&self, id: &str) {
        let repo = Arc::clone(&self.repo);
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(e) = repo.touch_last_used(&id, Utc::now()).await {
                warn!(key_id = %id, "Failed to record API key use: {}", e);
            }
        });
    }
}

fn record_validation(result: &'static str) {
    metrics::counter!("api_key_validations_total", "result" => result).increment(1);
}
