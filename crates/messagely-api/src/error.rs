use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use messagely_directory::{DirectoryError, ErrorKind};
use messagely_types::api::{ErrorBody, ErrorDetail};

/// Handler error: a status code plus a client-safe message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// Log the cause and hide it from the client.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!("Internal error: {}", cause);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ErrorKind::Conflict => Self::new(
                StatusCode::CONFLICT,
                "Username already taken, please pick another!",
            ),
            ErrorKind::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ErrorKind::Authentication => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
            ErrorKind::Internal => Self::internal(err),
        }
    }
}

/// Malformed or non-JSON bodies are client errors, reported in the usual body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                message: self.message,
                status: self.status.as_u16(),
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_directory_errors_to_statuses() {
        let cases = [
            (DirectoryError::Validation("missing".into()), StatusCode::BAD_REQUEST),
            (DirectoryError::Conflict("taken".into()), StatusCode::CONFLICT),
            (DirectoryError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (DirectoryError::Authentication("nope".into()), StatusCode::UNAUTHORIZED),
            (
                DirectoryError::Internal(anyhow::anyhow!("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_message_is_hidden() {
        let err = ApiError::from(DirectoryError::Internal(anyhow::anyhow!("disk on fire")));
        assert_eq!(err.message, "Internal server error");
    }
}
