use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::parser::ParseError;

/// Application-level errors
///
/// Every failure carries a machine-readable kind (see [`AppError::kind`])
/// plus a human-readable message. Stack traces are never part of the
/// response contract.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No eligible clothing items: {0}")]
    NoInventory(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Generation service unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable failure kind reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "persistence",
            AppError::Cache(_) => "cache",
            AppError::HttpClient(_) => "external_api",
            AppError::NotFound(_) => "not_found",
            AppError::NoInventory(_) => "no_inventory",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Parse(ParseError::NoStructuredBlock) => "no_structured_block",
            AppError::Parse(ParseError::MalformedData(_)) => "malformed_data",
            AppError::Parse(ParseError::EmptyResult) => "empty_result",
            AppError::GenerationUnavailable(_) => "generation_unavailable",
            AppError::ExternalApi(_) => "external_api",
            AppError::Internal(_) => "internal",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoInventory(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::GenerationUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::HttpClient(_) | AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Parse(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "kind": self.kind(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
