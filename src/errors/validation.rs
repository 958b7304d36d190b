//! Form validation errors
//!
//! Every variant renders the exact message returned to the submitter.

use thiserror::Error;

/// Malformed or inconsistent form input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid employee type (must be individual or cluster)")]
    InvalidEmployeeType,

    #[error("Please select at least 2 grampanchayats for cluster type")]
    ClusterNeedsTwoGrampanchayats,

    #[error("Please select exactly 1 grampanchayat for individual type")]
    IndividualNeedsOneGrampanchayat,

    #[error("Invalid permanent address pincode (must be 6 digits)")]
    InvalidPermanentPincode,

    #[error("Invalid current address pincode (must be 6 digits)")]
    InvalidCurrentPincode,

    #[error("Invalid CIBIL score (must be 300-900)")]
    InvalidCibilScore,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid date for {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid number for {0}")]
    InvalidNumber(String),

    #[error("Search term is required")]
    MissingSearchTerm,
}

impl ValidationError {
    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }

    pub fn http_status_code(&self) -> u16 {
        400
    }

    /// Field the error refers to, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidEmployeeType => Some("employeeType"),
            ValidationError::ClusterNeedsTwoGrampanchayats
            | ValidationError::IndividualNeedsOneGrampanchayat => Some("grampanchayat"),
            ValidationError::InvalidPermanentPincode => Some("permPincode"),
            ValidationError::InvalidCurrentPincode => Some("currPincode"),
            ValidationError::InvalidCibilScore => Some("cibilScore"),
            ValidationError::MissingField(field)
            | ValidationError::InvalidDate(field)
            | ValidationError::InvalidNumber(field) => Some(field),
            ValidationError::MissingSearchTerm => Some("term"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingField("cscId".to_string()).to_string(),
            "Missing required field: cscId"
        );
        assert_eq!(
            ValidationError::InvalidDate("dob".to_string()).to_string(),
            "Invalid date for dob (expected YYYY-MM-DD)"
        );
    }

    #[test]
    fn test_field() {
        assert_eq!(ValidationError::InvalidCurrentPincode.field(), Some("currPincode"));
        assert_eq!(
            ValidationError::InvalidNumber("numChildren".to_string()).field(),
            Some("numChildren")
        );
    }
}
