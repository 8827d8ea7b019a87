use http::StatusCode;
use login_panel::{AuthError, ValidationError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Map login, registration and page failures to status codes. The body is always
/// the user-facing message, never internal detail.
impl<T> IntoResponseError<T> for Result<T, AuthError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match &e {
                AuthError::Validation(ValidationError::AlreadyRegistered) => StatusCode::CONFLICT,
                AuthError::Validation(ValidationError::NotRegistered) => StatusCode::NOT_FOUND,
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                // Only a refused page request produces this; the facade has logged it
                AuthError::Session(_) => StatusCode::BAD_REQUEST,
                AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.user_message())
        })
    }
}
