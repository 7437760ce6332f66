use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use messagewall_types::api::ErrorBody;
use messagewall_types::models::MessageKind;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Posting too fast, please wait a few seconds")]
    TooFrequent,

    #[error("Content must be a non-empty string")]
    BadContent,

    #[error("Type must be \"wall\" or \"note\"")]
    BadType,

    #[error("A {} is limited to {} characters", .0.display_name(), .0.max_chars())]
    TooLong(MessageKind),

    #[error("Malformed JSON body: {0}")]
    BadJson(String),

    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    Db(anyhow::Error),
}

impl ApiError {
    /// Stable machine-readable code sent as `error`.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::TooFrequent => "too_frequent",
            ApiError::BadContent => "bad_content",
            ApiError::BadType => "bad_type",
            ApiError::TooLong(_) => "too_long",
            ApiError::BadJson(_) => "bad_json",
            ApiError::PayloadTooLarge => "payload_too_large",
            ApiError::Db(_) => "db_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::TooFrequent => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadContent
            | ApiError::BadType
            | ApiError::TooLong(_)
            | ApiError::BadJson(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadJson(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Store details stay in the log, never in the response
        let message = match &self {
            ApiError::Db(e) => {
                error!("Store failure: {:#}", e);
                None
            }
            other => Some(other.to_string()),
        };

        let body = ErrorBody {
            error: self.code().to_string(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}
