//! Environment repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::error::{RepositoryError, WriteResultExt};
use crate::entities::environments;

/// Environment repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EnvironmentRepository {
    db: DatabaseConnection,
}

impl EnvironmentRepository {
    /// Creates a new environment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an environment under a project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the project already has an
    /// environment with this name, or `RepositoryError::MissingParent` if the
    /// project does not exist.
    pub async fn create(
        &self,
        project_id: Uuid,
        name: &str,
    ) -> Result<environments::Model, RepositoryError> {
        let environment = environments::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            project_id: Set(project_id),
            created_at: Set(Utc::now().into()),
        };

        environment
            .insert(&self.db)
            .await
            .classify(&format!("environment '{name}'"), "project")
    }

    /// Finds an environment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<environments::Model>, DbErr> {
        environments::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a project's environment by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(
        &self,
        project_id: Uuid,
        name: &str,
    ) -> Result<Option<environments::Model>, DbErr> {
        environments::Entity::find()
            .filter(environments::Column::ProjectId.eq(project_id))
            .filter(environments::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Lists a project's environments by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<environments::Model>, DbErr> {
        environments::Entity::find()
            .filter(environments::Column::ProjectId.eq(project_id))
            .order_by_asc(environments::Column::Name)
            .all(&self.db)
            .await
    }

    /// Deletes an environment. Its API keys and events go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = environments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
