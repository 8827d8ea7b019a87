//! Error types for the coordination layer

use thiserror::Error;

use crate::session::SessionError;
use crate::userdb::UserError;

/// Rejected user input. The display text is the message shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address.")]
    InvalidEmailFormat,

    #[error("User already registered!")]
    AlreadyRegistered,

    #[error("User not registered!")]
    NotRegistered,

    #[error("Please enter a name.")]
    MissingName,

    #[error("Please enter an enterprise.")]
    MissingEnterprise,

    #[error("Please enter a position.")]
    MissingPosition,

    #[error("Please enter an authorization code.")]
    MissingAuthorizationCode,

    #[error("Please enter a valid authorization code.")]
    InvalidAuthorizationCode,

    #[error("Please enter a password.")]
    MissingPassword,

    #[error("Passwords do not match.")]
    PasswordMismatch,
}

/// Errors from the login and registration entry points
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No user matches the email and password. Unknown email and wrong password
    /// are deliberately indistinguishable.
    #[error("Incorrect email or password.")]
    InvalidCredentials,

    /// The user repository failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A session facade contract was violated
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

impl AuthError {
    /// Message that is safe to show to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) | Self::InvalidCredentials => self.to_string(),
            Self::Storage(_) | Self::Session(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Validation(err) => tracing::warn!("Validation failed: {:?}", err),
            Self::InvalidCredentials => tracing::warn!("Invalid credentials"),
            Self::Storage(msg) => tracing::error!("Storage error: {}", msg),
            Self::Session(err) => tracing::error!("Session error: {}", err),
        }
        self
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        Self::Storage(err.to_string())
    }
}
