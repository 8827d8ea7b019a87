use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A page change the facade does not allow. This is a caller defect, not user input.
    #[error("Invalid page transition: {0}")]
    InvalidPageTransition(String),
}

impl SessionError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::InvalidPageTransition(msg) => {
                tracing::error!("Invalid page transition: {}", msg)
            }
        }
        self
    }
}
