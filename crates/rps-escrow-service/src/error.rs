//! API error type.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use custody_core::{CustodyError, HexError};
use rps_core::{ErrorKind, MatchError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Invalid {field}: {source}")]
    BadHex {
        field: &'static str,
        #[source]
        source: HexError,
    },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Conflict(String),
}

/// `Json` extractor whose rejections are reported as `ApiError`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn bad_hex(field: &'static str) -> impl FnOnce(HexError) -> ApiError {
        move |source| ApiError::BadHex { field, source }
    }

    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Match(e) => {
                let kind = e.kind();
                let status = match kind {
                    ErrorKind::Validation => StatusCode::BAD_REQUEST,
                    ErrorKind::StateConflict => StatusCode::CONFLICT,
                    ErrorKind::Authorization => StatusCode::FORBIDDEN,
                    ErrorKind::CommitmentMismatch => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::Timing => StatusCode::PRECONDITION_FAILED,
                    ErrorKind::Custody => StatusCode::PAYMENT_REQUIRED,
                };
                (status, kind.as_str())
            }
            ApiError::BadHex { .. } | ApiError::InvalidBody(_) => {
                (StatusCode::BAD_REQUEST, ErrorKind::Validation.as_str())
            }
            ApiError::Conflict(_) => (StatusCode::CONFLICT, ErrorKind::StateConflict.as_str()),
        }
    }
}

impl From<CustodyError> for ApiError {
    fn from(e: CustodyError) -> Self {
        ApiError::Match(MatchError::Custody(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        (
            status,
            Json(serde_json::json!({"error": self.to_string(), "kind": kind})),
        )
            .into_response()
    }
}
