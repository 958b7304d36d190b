//! Geography resolution errors

use thiserror::Error;

/// Lookup failures while resolving the division → grampanchayat hierarchy
#[derive(Error, Debug)]
pub enum GeographyError {
    #[error("One or more selected grampanchayats not found")]
    GrampanchayatsNotFound,

    #[error("Division not found")]
    DivisionNotFound,

    #[error("District not found")]
    DistrictNotFound,

    #[error("Block not found")]
    BlockNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl GeographyError {
    pub fn is_not_found(&self) -> bool {
        !matches!(self, GeographyError::Database(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            GeographyError::Database(_) => "DATABASE_ERROR",
            _ => "NOT_FOUND",
        }
    }

    /// Unknown ids are client input errors, not missing resources
    pub fn http_status_code(&self) -> u16 {
        match self {
            GeographyError::Database(_) => 500,
            _ => 400,
        }
    }
}
