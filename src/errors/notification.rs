//! Confirmation mail errors
//!
//! These never leave the notification dispatcher; they are logged and the
//! dispatch reports `false`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("Message construction failed: {0}")]
    Build(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

impl NotificationError {
    pub fn invalid_address(address: impl Into<String>, reason: impl ToString) -> Self {
        NotificationError::Address {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}
