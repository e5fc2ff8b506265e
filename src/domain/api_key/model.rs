//! ApiKey domain entity

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored API key. Holds the peppered hash only, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    /// Display prefix, e.g. `otts_1a2b3c4d...`
    pub prefix: String,
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub enabled: bool,
    /// Speak requests served with this key
    pub usage_count: i64,
    /// Characters of text synthesized with this key
    pub characters_used: i64,
}

impl ApiKey {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, key_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            prefix: prefix.into(),
            key_hash,
            created_at: Utc::now(),
            last_used_at: None,
            enabled: true,
            usage_count: 0,
            characters_used: 0,
        }
    }
}
