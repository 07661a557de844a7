//! Project repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::error::{RepositoryError, WriteResultExt};
use crate::entities::projects;

/// Project repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a project owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a project
    /// with this slug, or `RepositoryError::MissingParent` if the user does
    /// not exist.
    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<projects::Model, RepositoryError> {
        let now = Utc::now().into();
        let project = projects::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        project
            .insert(&self.db)
            .await
            .classify(&format!("project slug '{slug}'"), "user")
    }

    /// Finds a project by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<projects::Model>, DbErr> {
        projects::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds one of a user's projects by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_slug(
        &self,
        user_id: Uuid,
        slug: &str,
    ) -> Result<Option<projects::Model>, DbErr> {
        projects::Entity::find()
            .filter(projects::Column::UserId.eq(user_id))
            .filter(projects::Column::Slug.eq(slug))
            .one(&self.db)
            .await
    }

    /// Lists a user's projects, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<projects::Model>, DbErr> {
        projects::Entity::find()
            .filter(projects::Column::UserId.eq(user_id))
            .order_by_asc(projects::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Renames a project and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist.
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<projects::Model, RepositoryError> {
        let project = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("project".to_string()))?;

        let mut active: projects::ActiveModel = project.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a project. Its environments go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = projects::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
