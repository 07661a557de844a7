//! Session repository for database operations.
//!
//! A session row maps an opaque token (the primary key) to a user until its
//! expiry.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::error::{RepositoryError, WriteResultExt};
use crate::entities::{sessions, users};

/// Session repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingParent` if the user does not exist.
    pub async fn create(
        &self,
        user_id: Uuid,
        session_token: &str,
        expires: DateTime<Utc>,
    ) -> Result<sessions::Model, RepositoryError> {
        let session = sessions::ActiveModel {
            session_token: Set(session_token.to_string()),
            user_id: Set(user_id),
            expires: Set(expires.into()),
        };

        session.insert(&self.db).await.classify("session", "user")
    }

    /// Finds a live session and its user by token.
    ///
    /// Expired rows are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_user(
        &self,
        session_token: &str,
    ) -> Result<Option<(sessions::Model, users::Model)>, DbErr> {
        let result = sessions::Entity::find_by_id(session_token.to_string())
            .filter(sessions::Column::Expires.gt(Utc::now()))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?;

        Ok(result.and_then(|(session, user)| user.map(|u| (session, u))))
    }

    /// Gets all live sessions for a user, newest expiry first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_user_sessions(&self, user_id: Uuid) -> Result<Vec<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::Expires.gt(Utc::now()))
            .order_by_desc(sessions::Column::Expires)
            .all(&self.db)
            .await
    }

    /// Counts live sessions for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_active_sessions(&self, user_id: Uuid) -> Result<u64, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::Expires.gt(Utc::now()))
            .count(&self.db)
            .await
    }

    /// Moves a session's expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_expiry(
        &self,
        session_token: &str,
        expires: DateTime<Utc>,
    ) -> Result<sessions::Model, DbErr> {
        sessions::ActiveModel {
            session_token: Set(session_token.to_string()),
            expires: Set(expires.into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, session_token: &str) -> Result<bool, DbErr> {
        let result = sessions::Entity::delete_by_id(session_token.to_string())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes every session of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Cleans up expired sessions (for maintenance).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn cleanup_expired(&self) -> Result<u64, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Expires.lte(Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
