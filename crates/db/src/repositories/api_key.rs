//! API key repository.
//!
//! Keys are stored as a SHA-256 hash plus a display prefix; the plaintext is
//! returned once, from `create`.

use chrono::Utc;
use eventi_core::auth::{generate_api_key, hash_api_key, is_well_formed};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::error::{RepositoryError, WriteResultExt};
use crate::entities::api_keys;

/// A newly created key with its one-time plaintext.
#[derive(Debug, Clone)]
pub struct CreatedApiKey {
    /// Stored row.
    pub model: api_keys::Model,
    /// Full key; never stored.
    pub plaintext: String,
}

/// API key repository.
#[derive(Debug, Clone)]
pub struct ApiKeyRepository {
    db: DatabaseConnection,
}

impl ApiKeyRepository {
    /// Creates a new API key repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates and stores a key for an environment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingParent` if the environment does not
    /// exist.
    pub async fn create(
        &self,
        environment_id: Uuid,
        name: &str,
    ) -> Result<CreatedApiKey, RepositoryError> {
        let generated = generate_api_key();
        let model = self
            .insert_hashed(environment_id, name, &generated.hash, &generated.prefix)
            .await?;

        Ok(CreatedApiKey {
            model,
            plaintext: generated.plaintext,
        })
    }

    /// Stores an already-hashed key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the hash is already stored, or
    /// `RepositoryError::MissingParent` if the environment does not exist.
    pub async fn insert_hashed(
        &self,
        environment_id: Uuid,
        name: &str,
        key_hash: &str,
        key_prefix: &str,
    ) -> Result<api_keys::Model, RepositoryError> {
        api_keys::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            key_hash: Set(key_hash.to_string()),
            key_prefix: Set(key_prefix.to_string()),
            environment_id: Set(environment_id),
            last_used_at: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .classify("api key", "environment")
    }

    /// Finds the key matching a presented plaintext.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_key(&self, plaintext: &str) -> Result<Option<api_keys::Model>, DbErr> {
        if !is_well_formed(plaintext) {
            return Ok(None);
        }

        api_keys::Entity::find()
            .filter(api_keys::Column::KeyHash.eq(hash_api_key(plaintext)))
            .one(&self.db)
            .await
    }

    /// Resolves a presented key and records the use.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or update fails.
    pub async fn authenticate(&self, plaintext: &str) -> Result<Option<api_keys::Model>, DbErr> {
        let Some(key) = self.find_by_key(plaintext).await? else {
            return Ok(None);
        };

        let mut active: api_keys::ActiveModel = key.into();
        active.last_used_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await.map(Some)
    }

    /// Lists an environment's keys, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_environment(
        &self,
        environment_id: Uuid,
    ) -> Result<Vec<api_keys::Model>, DbErr> {
        api_keys::Entity::find()
            .filter(api_keys::Column::EnvironmentId.eq(environment_id))
            .order_by_desc(api_keys::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = api_keys::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
