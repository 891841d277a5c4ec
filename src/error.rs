use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid quote: {0}")]
    InvalidQuote(String),

    #[error("invalid option chain: {0}")]
    InvalidChain(String),

    #[error("not coverable: {shares} shares owned, a covered call requires at least 100")]
    NotCoverable { shares: u32 },

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::InvalidQuote(_) | AppError::InvalidChain(_) | AppError::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::NotCoverable { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
