//! Input checks for login and registration

use std::sync::LazyLock;

use regex::Regex;

use super::credentials::AuthorizationCodes;
use super::errors::ValidationError;
use super::registration::{RegistrationAction, RegistrationForm};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Loose `local@domain.tld` shape check. The whole string must match.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub(crate) fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmailFormat)
    }
}

/// Checks that follow the existence check, in reporting order.
///
/// Returns the first failure only.
pub(crate) fn validate_form_fields(
    action: RegistrationAction,
    form: &RegistrationForm,
    codes: &AuthorizationCodes,
) -> Result<(), ValidationError> {
    let edits = matches!(
        action,
        RegistrationAction::Register | RegistrationAction::Update
    );

    if edits && form.name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if edits && form.enterprise.is_empty() {
        return Err(ValidationError::MissingEnterprise);
    }
    if edits && form.position.is_empty() {
        return Err(ValidationError::MissingPosition);
    }
    if form.authorization_code.is_empty() {
        return Err(ValidationError::MissingAuthorizationCode);
    }
    if !codes.contains(&form.authorization_code) {
        return Err(ValidationError::InvalidAuthorizationCode);
    }
    if edits && form.password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    if edits && form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
