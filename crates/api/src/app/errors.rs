use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use stockroom_core::DomainError;

/// Failure of a request handled against the shared catalog.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The catalog lock was poisoned by a panicking writer.
    #[error("catalog state is unavailable")]
    Unavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Unavailable => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "unavailable",
                "catalog state is unavailable",
            ),
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        e @ DomainError::InsufficientStock { .. } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_stock",
            e.to_string(),
        ),
        e @ DomainError::EmptyHistory => {
            json_error(StatusCode::CONFLICT, "empty_history", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (
                DomainError::insufficient_stock("Lamp", 3, 1),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::EmptyHistory, StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(domain_error_to_response(err).status(), status);
        }
        assert_eq!(
            ApiError::Unavailable.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
