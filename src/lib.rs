//! # Odia TTS Gateway
//!
//! API-key gateway in front of an upstream text-to-speech endpoint: admins
//! mint keys, callers present them on `/speak`, and the gateway streams the
//! upstream audio back.
//!
//! ## Architecture
//!
//! - **domain**: the `ApiKey` record and its repository trait
//! - **application**: key manager, admin gate and speak forwarder
//! - **infrastructure**: key hashing, SeaORM and in-memory key stores
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime lifecycle and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export key store types for easy access
pub use infrastructure::{init_database, open_key_store, DatabaseConfig, KeyStore};

// Re-export API router
pub use interfaces::{create_api_router, GatewayState};

pub use shared::{GatewayError, GatewayResult};
