pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmApiKeyRepository;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL, e.g. "sqlite://./odia_gateway.db?mode=rwc" or
    /// "postgres://user:pw@host/db"
    pub url: String,
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", redact_url(&config.url));
    let mut opts = ConnectOptions::new(config.url.clone());
    opts.sqlx_logging(false);
    if config.url.contains(":memory:") {
        // every pooled connection to `:memory:` would be a separate database
        opts.max_connections(1).min_connections(1);
    }
    let db = Database::connect(opts).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Strip credentials from a connection URL before logging it.
pub fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
