/**
 * Error Conversion
 *
 * Maps `AuthError` to HTTP responses so handlers can return
 * `Result<_, AuthError>` directly. The response body mirrors the shape
 * clients already expect: `{"detail": "..."}`.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::types::{AuthError, StoreError};

impl AuthError {
    /// HTTP status code for this error.
    ///
    /// `Unauthenticated` and `SessionExpired` both map to 401 (the detail
    /// message distinguishes them), `Forbidden` to 403, validation and
    /// credential failures to 400, and anything internal to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::SessionExpired => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UserNotFound(_)
            | Self::InvalidCredentials
            | Self::EmailInUse
            | Self::DuplicateEmail
            | Self::ExchangeFailed(_)
            | Self::InvalidData(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::UniqueViolation) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Token(_) | Self::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures get logged with detail but answer with a
        // generic message; everything else is safe to echo.
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {:?}", self);
            "Internal server error".to_string()
        } else {
            tracing::warn!("Request failed: {}", self);
            self.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            AuthError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::SessionExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::UserNotFound("a@b.c".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::EmailInUse.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::ExchangeFailed("denied".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::NotFound("User".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::Store(StoreError::UniqueViolation).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
