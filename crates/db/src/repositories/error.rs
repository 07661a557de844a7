//! Repository error type.
//!
//! Constraint violations reported by the database are turned into typed
//! variants here, so callers can answer "conflict" without parsing driver
//! messages.

use sea_orm::{DbErr, SqlErr};
use eventi_shared::AppError;

/// Errors returned by repository writes.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write.
    #[error("{0} already exists")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist.
    #[error("{0} not found")]
    MissingParent(String),

    /// The row to update does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Classifies a database error raised while writing `what`.
    #[must_use]
    pub fn classify(err: DbErr, what: &str, parent: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict(what.to_string()),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::MissingParent(parent.to_string())
            }
            _ => Self::Database(err),
        }
    }

    /// Returns true for unique-constraint conflicts.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Maps write results onto [`RepositoryError`].
pub(crate) trait WriteResultExt<T> {
    /// Classifies a failed write of `what` whose parent row is `parent`.
    fn classify(self, what: &str, parent: &str) -> Result<T, RepositoryError>;
}

impl<T> WriteResultExt<T> for Result<T, DbErr> {
    fn classify(self, what: &str, parent: &str) -> Result<T, RepositoryError> {
        self.map_err(|e| RepositoryError::classify(e, what, parent))
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => Self::Conflict(err.to_string()),
            RepositoryError::MissingParent(_) | RepositoryError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            RepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RepositoryError::Conflict("project slug 'web'".into()), 409)]
    #[case(RepositoryError::MissingParent("environment".into()), 404)]
    #[case(RepositoryError::NotFound("user".into()), 404)]
    #[case(RepositoryError::Database(DbErr::Custom("boom".into())), 500)]
    fn test_status_mapping(#[case] err: RepositoryError, #[case] status: u16) {
        let app: AppError = err.into();
        assert_eq!(app.status_code(), status);
    }

    #[test]
    fn test_conflict_message() {
        let err = RepositoryError::Conflict("project slug 'web'".to_string());
        assert!(err.is_conflict());

        let app: AppError = err.into();
        assert_eq!(app.to_string(), "Conflict: project slug 'web' already exists");
    }

    #[test]
    fn test_unclassified_errors_stay_database_errors() {
        let err = RepositoryError::classify(DbErr::Custom("boom".to_string()), "user", "user");
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
