//! Domain layer: entities and repository interfaces

pub mod api_key;

pub use api_key::{ApiKey, ApiKeyRepository};
