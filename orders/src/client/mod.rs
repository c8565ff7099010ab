//! Client side of the order service: form state with local validation, the
//! HTTP calls, and the in-memory order list the user browses and filters.
//!
//! Local validation mirrors the server's required-field rules only to fail
//! fast; the server re-validates every submission.

pub mod api;
pub mod board;
pub mod form;

pub use api::OrderApi;
pub use board::{OrderBoard, OrderFilter};
pub use form::{FormMode, OrderDraft, PhotoFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Server responded with {status}: {message}")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read photo {path}: {source}")]
    Photo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid API address: {0}")]
    Url(#[from] url::ParseError),
}
