//! Error types for the SEO page monitor.
//!
//! This module provides structured error handling with:
//! - `AppError`: Domain-specific errors for application operations
//! - `Result<T>`: Type alias for Results using AppError

use thiserror::Error;

use crate::sync::SheetError;

/// Domain-specific errors for application operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Failed to parse HTML content
    #[error("HTML parsing error: {0}")]
    ParseError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// No monitored page exists for the given URL
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A page with the given URL is already monitored
    #[error("Page already exists: {0}")]
    PageExists(String),

    /// Remote spreadsheet error
    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
