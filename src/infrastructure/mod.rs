//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod storage;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

pub use database::{init_database, redact_url, DatabaseConfig, SeaOrmApiKeyRepository};
pub use storage::InMemoryApiKeyRepository;

use crate::domain::ApiKeyRepository;
use crate::shared::GatewayResult;
use database::migrator::Migrator;

/// `DATABASE_URL` value selecting the in-process store
pub const MEMORY_STORE_URL: &str = "memory://";

/// An opened key store. `db` is set for SeaORM-backed stores so the runtime
/// can close it on shutdown.
pub struct KeyStore {
    pub repository: Arc<dyn ApiKeyRepository>,
    pub db: Option<DatabaseConnection>,
}

/// Open the key store named by `config.url`, running migrations if asked.
pub async fn open_key_store(config: &DatabaseConfig, auto_migrate: bool) -> GatewayResult<KeyStore> {
    if config.url == MEMORY_STORE_URL {
        info!("Using in-memory key store; keys are lost on restart");
        return Ok(KeyStore {
            repository: Arc::new(InMemoryApiKeyRepository::new()),
            db: None,
        });
    }

    let db = init_database(config).await?;
    if auto_migrate {
        info!("Running database migrations...");
        Migrator::up(&db, None).await?;
        info!("Migrations completed");
    }

    Ok(KeyStore {
        repository: Arc::new(SeaOrmApiKeyRepository::new(db.clone())),
        db: Some(db),
    })
}
