use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rhea_core::RheaError;
use serde::Serialize;

/// `{"error": "..."}` with a status derived from the error kind.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<RheaError> for ApiError {
    fn from(error: RheaError) -> Self {
        let (status, message) = match error {
            RheaError::Validation(m) => (StatusCode::BAD_REQUEST, m),
            RheaError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            RheaError::Generation(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status, body).into_response()
    }
}

/// `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
