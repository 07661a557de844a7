//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventi_db::RepositoryError;
use eventi_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use crate::auth::AuthError;

/// An [`AppError`] rendered as `{"error": ..., "message": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a 401 response.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
            "An internal error occurred".to_string()
        } else {
            match &self.0 {
                AppError::Unauthorized(m)
                | AppError::Forbidden(m)
                | AppError::NotFound(m)
                | AppError::Validation(m)
                | AppError::Conflict(m)
                | AppError::Database(m)
                | AppError::ExternalService(m)
                | AppError::Internal(m) => m.clone(),
            }
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code().to_lowercase(),
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => e.into(),
            AuthError::Repository(e) => e.into(),
            AuthError::UnknownProvider(id) => Self(AppError::NotFound(format!("provider '{id}'"))),
            other => Self(AppError::Unauthorized(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_client_error_keeps_message() {
        let response = ApiError::unauthorized("Authentication required").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error"], "unauthorized");
        assert_eq!(body["message"], "Authentication required");
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let response = ApiError::from(DbErr::Custom("connection refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = ApiError::from(RepositoryError::Conflict("project slug 'docs'".into()));
        assert_eq!(err.0.status_code(), 409);
    }
}
