use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use runtime::RuntimeError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid query: {0}")]
    BadQuery(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Runtime(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Internal details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::BadQuery(reason) => reason.clone(),
            ApiError::Runtime(err) if err.is_insufficient_abilities() => {
                "Not enough abilities in database".to_string()
            }
            ApiError::Runtime(_) => "Failed to generate game rounds".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "error generating game rounds");
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
