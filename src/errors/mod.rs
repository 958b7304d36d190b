//! Domain-specific error types for the VLE registry
//!
//! # Error Categories
//!
//! - **ValidationError**: malformed or inconsistent form input (400)
//! - **GeographyError**: unknown division/district/block/grampanchayat (400)
//! - **RecordError**: create/search/update failures, wraps the two above (400/404/500)
//! - **NotificationError**: confirmation mail failures, never surfaced to callers
//!
//! # Examples
//!
//! ```rust
//! use vle_registry::errors::{RecordError, ValidationError};
//!
//! let err: RecordError = ValidationError::InvalidCibilScore.into();
//! assert_eq!(err.http_status_code(), 400);
//! assert_eq!(err.to_string(), "Invalid CIBIL score (must be 300-900)");
//! ```

pub mod geography;
pub mod notification;
pub mod record;
pub mod validation;

pub use geography::GeographyError;
pub use notification::NotificationError;
pub use record::RecordError;
pub use validation::ValidationError;

/// Result type alias for form validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type alias for geography lookups
pub type GeographyResult<T> = Result<T, GeographyError>;

/// Result type alias for record lifecycle operations
pub type RecordResult<T> = Result<T, RecordError>;
