//! Provider account repository.
//!
//! An account links a local user to an identity at an external provider,
//! keyed by `(provider, provider_account_id)`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::error::{RepositoryError, WriteResultExt};
use crate::entities::{accounts, users};

/// Account type stored for OAuth logins.
pub const OAUTH_ACCOUNT_TYPE: &str = "oauth";

/// Input for linking a provider account.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    /// Local user.
    pub user_id: Uuid,
    /// Provider ID, e.g. `github`.
    pub provider: String,
    /// The provider's identifier for the user.
    pub provider_account_id: String,
    /// Access token issued by the provider.
    pub access_token: Option<String>,
    /// Refresh token issued by the provider.
    pub refresh_token: Option<String>,
    /// Access token expiry, unix seconds.
    pub expires_at: Option<i64>,
    /// Token type, usually `bearer`.
    pub token_type: Option<String>,
    /// Granted scopes.
    pub scope: Option<String>,
    /// OpenID Connect ID token.
    pub id_token: Option<String>,
}

impl NewAccount {
    pub(crate) fn into_active_model(self) -> accounts::ActiveModel {
        accounts::ActiveModel {
            user_id: Set(self.user_id),
            account_type: Set(OAUTH_ACCOUNT_TYPE.to_string()),
            provider: Set(self.provider),
            provider_account_id: Set(self.provider_account_id),
            refresh_token: Set(self.refresh_token),
            access_token: Set(self.access_token),
            expires_at: Set(self.expires_at),
            token_type: Set(self.token_type),
            scope: Set(self.scope),
            id_token: Set(self.id_token),
            session_state: Set(None),
        }
    }
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Links a provider account to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the provider account is already
    /// linked, or `RepositoryError::MissingParent` if the user does not exist.
    pub async fn link(&self, input: NewAccount) -> Result<accounts::Model, RepositoryError> {
        input
            .into_active_model()
            .insert(&self.db)
            .await
            .classify("provider account", "user")
    }

    /// Finds an account by its provider key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_provider(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id((provider.to_string(), provider_account_id.to_string()))
            .one(&self.db)
            .await
    }

    /// Finds the user linked to a provider account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        let result = accounts::Entity::find()
            .filter(accounts::Column::Provider.eq(provider))
            .filter(accounts::Column::ProviderAccountId.eq(provider_account_id))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?;

        Ok(result.and_then(|(_, user)| user))
    }

    /// Lists all accounts linked to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Provider)
            .all(&self.db)
            .await
    }

    /// Removes a provider link.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn unlink(&self, provider: &str, provider_account_id: &str) -> Result<bool, DbErr> {
        let result = accounts::Entity::delete_by_id((
            provider.to_string(),
            provider_account_id.to_string(),
        ))
        .exec(&self.db)
        .await?;

        Ok(result.rows_affected > 0)
    }
}
