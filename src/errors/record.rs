//! Record lifecycle errors

use thiserror::Error;

use super::{GeographyError, ValidationError};

/// Failures of submit, search and update
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Geography(#[from] GeographyError),

    /// Update targeted a CSC ID with no stored record
    #[error("No record found for CSC ID {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RecordError {
    /// Check if this error was detected before anything was written
    pub fn is_client_error(&self) -> bool {
        self.http_status_code() < 500
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            RecordError::Validation(err) => err.error_code(),
            RecordError::Geography(err) => err.error_code(),
            RecordError::NotFound(_) => "NOT_FOUND",
            RecordError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            RecordError::Validation(err) => err.http_status_code(),
            RecordError::Geography(err) => err.http_status_code(),
            RecordError::NotFound(_) => 404,
            RecordError::Database(_) => 500,
        }
    }
}
