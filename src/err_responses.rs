use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

/// Every way a request to this service can fail. Each variant maps to one HTTP status and a
/// JSON `{ error, details? }` body.
#[derive(Debug, thiserror::Error)]
pub enum BillError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Billplz is not configured on the server")]
    Configuration,
    #[error("Failed to create Billplz bill")]
    Provider { status: u16, body: String },
    #[error("Invalid X-Signature")]
    Unauthorized,
    #[error("Server error")]
    Server(String),
}

impl BillError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Configuration | Self::Provider { .. } | Self::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::Provider { status, body } => Some(json!({ "status": status, "body": body })),
            Self::Server(message) => Some(Value::String(message.clone())),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for BillError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
                details: self.details(),
            }),
        )
            .into_response()
    }
}

/// Category a foreign error is filed under when it is converted with
/// [`MapErrorResponse::map_err_response`].
pub enum ErrorResponse {
    InvalidRequest,
    ServerError,
}

pub trait MapErrorResponse<T> {
    fn map_err_response(self, mapper: ErrorResponse) -> Result<T, BillError>;
}

impl<T, E: ToString> MapErrorResponse<T> for Result<T, E> {
    fn map_err_response(self, mapper: ErrorResponse) -> Result<T, BillError> {
        match self {
            Ok(val) => Ok(val),
            Err(err) => Err(mapper.transform(err)),
        }
    }
}

impl ErrorResponse {
    pub fn transform<E: ToString>(&self, err: E) -> BillError {
        match self {
            Self::InvalidRequest => BillError::InvalidRequest(err.to_string()),
            Self::ServerError => BillError::Server(err.to_string()),
        }
    }
}
