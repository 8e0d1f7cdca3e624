use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

// --- Store Errors ---

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Joke already exists with ID: {0}")]
    DuplicateKey(Uuid),

    #[error("Joke not found with ID: {0}")]
    NotFound(Uuid),

    #[error("Stored joke data is corrupt: {0}")]
    DataCorruption(String),

    #[error("Store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

// --- Service Errors ---

#[derive(Error, Debug)]
pub enum JokeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Joke ID already in use: {0}")]
    Conflict(Uuid),

    #[error("Joke store unavailable")]
    StoreUnavailable(#[source] StoreError),
}

impl JokeError {
    pub fn joke_not_found(id: Uuid) -> Self {
        JokeError::NotFound(format!("joke with ID {}", id))
    }
}

impl From<StoreError> for JokeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(id) => JokeError::Conflict(id),
            StoreError::NotFound(id) => JokeError::joke_not_found(id),
            e => JokeError::StoreUnavailable(e),
        }
    }
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid joke ID format: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Joke ID already in use: {0}")]
    Conflict(Uuid),
    #[error("Joke store unavailable")]
    StoreUnavailable(#[source] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Initialization error: {0}")]
    InitError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<JokeError> for AppError {
    fn from(err: JokeError) -> Self {
        match err {
            JokeError::InvalidInput(msg) => AppError::InvalidInput(msg),
            JokeError::NotFound(what) => AppError::NotFound(what),
            JokeError::Conflict(id) => AppError::Conflict(id),
            JokeError::StoreUnavailable(e) => AppError::StoreUnavailable(e),
        }
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<aws_smithy_types::error::operation::BuildError> for AppError {
    fn from(err: aws_smithy_types::error::operation::BuildError) -> Self {
        AppError::InitError(format!("Failed to build AWS request: {}", err))
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // 4xx Client Errors
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidUuid(e) => (StatusCode::BAD_REQUEST, format!("Invalid ID format: {}", e)),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {}", what)),
            AppError::Conflict(id) => (StatusCode::CONFLICT, format!("Joke ID already in use: {}", id)),

            // 5xx Server Errors
            AppError::StoreUnavailable(e) => {
                tracing::error!(error.source = ?e, "Store error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Joke store operation failed".to_string())
            }
            AppError::ConfigError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error".to_string())
            }
            AppError::InitError(msg) => {
                tracing::error!("Initialization error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server initialization error".to_string())
            }
            AppError::Io(e) => {
                tracing::error!(error.source = ?e, "I/O error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal server error occurred".to_string())
            }
        };

        if status.is_server_error() {
            tracing::error!(error.message = %error_message, error.detail = %self, "Responding with error");
        } else {
            tracing::debug!(error.message = %error_message, error.status = %status, "Responding with client error");
        }

        let body = Json(serde_json::json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_classify_into_service_kinds() {
        let id = Uuid::new_v4();
        assert!(matches!(JokeError::from(StoreError::DuplicateKey(id)), JokeError::Conflict(c) if c == id));
        assert!(matches!(JokeError::from(StoreError::NotFound(id)), JokeError::NotFound(_)));
        assert!(matches!(
            JokeError::from(StoreError::Backend(anyhow::anyhow!("boom"))),
            JokeError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn app_errors_map_to_status_codes() {
        let cases = [
            (AppError::InvalidInput("text is required".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("joke".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict(Uuid::nil()), StatusCode::CONFLICT),
            (
                AppError::StoreUnavailable(StoreError::DataCorruption("bad row".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
