use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::model::GenericError;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Image exceeds the maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Unsupported media type {0}, only images are accepted")]
    UnsupportedMediaType(String),

    #[error("Order not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[source] GenericError),

    #[error("Image storage error: {0}")]
    Image(#[source] GenericError),
}

impl OrderError {
    pub fn status(&self) -> StatusCode {
        match self {
            OrderError::Validation(_) | OrderError::BadRequest(_) => StatusCode::BAD_REQUEST,
            OrderError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            OrderError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            OrderError::NotFound => StatusCode::NOT_FOUND,
            OrderError::Store(_) | OrderError::Image(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Order request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
