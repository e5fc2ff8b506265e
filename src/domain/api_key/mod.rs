//! ApiKey aggregate
//!
//! Contains the stored API key record and the key store interface.

pub mod model;
pub mod repository;

pub use model::ApiKey;
pub use repository::ApiKeyRepository;
