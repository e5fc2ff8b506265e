//! SeaORM implementation of ApiKeyRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, Statement,
};

use crate::domain::{ApiKey, ApiKeyRepository};
use crate::infrastructure::database::entities::api_key;
use crate::shared::{GatewayError, GatewayResult};

pub struct SeaOrmApiKeyRepository {
    db: DatabaseConnection,
}

impl SeaOrmApiKeyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> GatewayError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            GatewayError::Conflict("api key hash already exists".to_string())
        }
        _ => GatewayError::Storage(e.to_string()),
    }
}

#[async_trait]
impl ApiKeyRepository for SeaOrmApiKeyRepository {
    async fn insert(&self, key: ApiKey) -> GatewayResult<ApiKey> {
        let model = api_key::ActiveModel {
            id: Set(key.id),
            name: Set(key.name),
            key_hash: Set(key.key_hash),
            prefix: Set(key.prefix),
            enabled: Set(key.enabled),
            created_at: Set(key.created_at),
            last_used_at: Set(key.last_used_at),
            usage_count: Set(key.usage_count),
            characters_used: Set(key.characters_used),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        debug!("Stored api key {} ({})", saved.id, saved.prefix);
        Ok(saved.into())
    }

    async fn find_by_hash(&self, key_hash: &str) -> GatewayResult<Option<ApiKey>> {
        let key = api_key::Entity::find()
            .filter(api_key::Column::KeyHash.eq(key_hash))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(key.map(Into::into))
    }

    async fn find_by_id(&self, id: &str) -> GatewayResult<Option<ApiKey>> {
        let key = api_key::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(key.map(Into::into))
    }

    async fn list(&self) -> GatewayResult<Vec<ApiKey>> {
        let keys = api_key::Entity::find()
            .order_by_desc(api_key::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(keys.into_iter().map(Into::into).collect())
    }

    async fn set_enabled(&self, id: &str, enabled: bool) -> GatewayResult<Option<ApiKey>> {
        let Some(key) = api_key::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            debug!("Api key '{}' not found", id);
            return Ok(None);
        };

        let mut active: api_key::ActiveModel = key.into();
        active.enabled = Set(enabled);
        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(updated.into()))
    }

    async fn touch_last_used(&self, id: &str, at: DateTime<Utc>) -> GatewayResult<()> {
        api_key::Entity::update_many()
            .filter(api_key::Column::Id.eq(id))
            .col_expr(api_key::Column::LastUsedAt, Expr::value(at))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn record_usage(&self, id: &str, characters: i64) -> GatewayResult<()> {
        // increment in SQL so concurrent requests do not lose counts
        api_key::Entity::update_many()
            .filter(api_key::Column::Id.eq(id))
            .col_expr(
                api_key::Column::UsageCount,
                Expr::col(api_key::Column::UsageCount).add(1),
            )
            .col_expr(
                api_key::Column::CharactersUsed,
                Expr::col(api_key::Column::CharactersUsed).add(characters),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn ping(&self) -> GatewayResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
