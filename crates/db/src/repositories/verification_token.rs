//! Verification token repository.
//!
//! Tokens are single-use: `use_token` deletes the row it returns.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use super::error::{RepositoryError, WriteResultExt};
use crate::entities::verification_tokens;

/// Verification token repository.
#[derive(Debug, Clone)]
pub struct VerificationTokenRepository {
    db: DatabaseConnection,
}

impl VerificationTokenRepository {
    /// Creates a new verification token repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a token for an identifier (usually an email address).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the pair already exists.
    pub async fn create(
        &self,
        identifier: &str,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<verification_tokens::Model, RepositoryError> {
        verification_tokens::ActiveModel {
            identifier: Set(identifier.to_string()),
            token: Set(token.to_string()),
            expires: Set(expires.into()),
        }
        .insert(&self.db)
        .await
        .classify("verification token", "identifier")
    }

    /// Consumes a token.
    ///
    /// Returns `None` if the pair does not exist or has expired. The row is
    /// deleted either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn use_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> Result<Option<verification_tokens::Model>, DbErr> {
        let key = (identifier.to_string(), token.to_string());
        let Some(found) = verification_tokens::Entity::find_by_id(key.clone())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let result = verification_tokens::Entity::delete_by_id(key)
            .exec(&self.db)
            .await?;

        // A concurrent consumer got there first.
        if result.rows_affected == 0 {
            return Ok(None);
        }

        if found.expires <= Utc::now() {
            return Ok(None);
        }

        Ok(Some(found))
    }

    /// Cleans up expired tokens (for maintenance).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn cleanup_expired(&self) -> Result<u64, DbErr> {
        let result = verification_tokens::Entity::delete_many()
            .filter(verification_tokens::Column::Expires.lte(Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
