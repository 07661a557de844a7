//! User repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use super::account::NewAccount;
use super::error::{RepositoryError, WriteResultExt};
use crate::entities::{accounts, users};

/// Input for creating a user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Email address (unique).
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL.
    pub image: Option<String>,
    /// When the email was verified, if the provider vouches for it.
    pub email_verified: Option<DateTime<Utc>>,
}

impl NewUser {
    fn into_active_model(self) -> users::ActiveModel {
        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(self.email),
            name: Set(self.name),
            image: Set(self.image),
            email_verified: Set(self.email_verified.map(Into::into)),
            created_at: Set(Utc::now().into()),
        }
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create(&self, input: NewUser) -> Result<users::Model, RepositoryError> {
        input
            .into_active_model()
            .insert(&self.db)
            .await
            .classify("user email", "user")
    }

    /// Creates a user together with its first provider account.
    ///
    /// Both rows are written in one transaction; `account.user_id` is
    /// replaced with the new user's ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or the provider
    /// account is already taken. Nothing is written in that case.
    pub async fn create_with_account(
        &self,
        input: NewUser,
        mut account: NewAccount,
    ) -> Result<(users::Model, accounts::Model), RepositoryError> {
        let txn = self.db.begin().await?;

        let user = input
            .into_active_model()
            .insert(&txn)
            .await
            .classify("user email", "user")?;

        account.user_id = user.id;
        let account = account
            .into_active_model()
            .insert(&txn)
            .await
            .classify("provider account", "user")?;

        txn.commit().await?;

        Ok((user, account))
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Updates the profile fields a provider may change between sign-ins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        image: Option<String>,
    ) -> Result<users::Model, RepositoryError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("user".to_string()))?;

        let mut active: users::ActiveModel = user.into();
        active.name = Set(name);
        active.image = Set(image);
        Ok(active.update(&self.db).await?)
    }

    /// Records that the user's email has been verified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn mark_email_verified(&self, id: Uuid) -> Result<users::Model, RepositoryError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("user".to_string()))?;

        let mut active: users::ActiveModel = user.into();
        active.email_verified = Set(Some(Utc::now().into()));
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a user. Projects, accounts, and sessions go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
