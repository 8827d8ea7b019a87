//! Login check and the register / update / delete workflow

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::userdb::{NewUser, UserPatch, UserRecord, UserRepository};

use super::credentials::{
    AuthorizationCodes, PasswordHasher, Sha256PasswordHasher, digests_match,
};
use super::errors::{AuthError, ValidationError};
use super::validation::{validate_email, validate_form_fields};

/// Which button the user pressed on the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationAction {
    Register,
    Update,
    Delete,
}

impl RegistrationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Confirmation shown to the user once the action has been applied
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Register => "User registered successfully!",
            Self::Update => "User updated successfully!",
            Self::Delete => "User deleted successfully!",
        }
    }
}

impl fmt::Display for RegistrationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration form as submitted. An empty string means the field was left blank.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistrationForm {
    pub email: String,
    pub name: String,
    pub enterprise: String,
    pub position: String,
    pub permission: String,
    pub exception: String,
    pub authorization_code: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("enterprise", &self.enterprise)
            .field("position", &self.position)
            .field("permission", &self.permission)
            .field("exception", &self.exception)
            .field("authorization_code", &"[redacted]")
            .field("password", &"[redacted]")
            .field("confirm_password", &"[redacted]")
            .finish()
    }
}

/// Partial update of an existing user. `None` keeps the stored value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub enterprise: Option<String>,
    pub position: Option<String>,
    pub permission: Option<String>,
    pub exception: Option<String>,
    pub authorization_code: Option<String>,
    /// New plain password, hashed before it is stored
    pub password: Option<String>,
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("name", &self.name)
            .field("enterprise", &self.enterprise)
            .field("position", &self.position)
            .field("permission", &self.permission)
            .field("exception", &self.exception)
            .field(
                "authorization_code",
                &self.authorization_code.as_ref().map(|_| "[redacted]"),
            )
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Validates user input and applies it to the user repository.
///
/// Holds no session state. Callers drive the session facade with the results.
#[derive(Clone)]
pub struct RegistrationWorkflow {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    codes: AuthorizationCodes,
}

impl RegistrationWorkflow {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        codes: AuthorizationCodes,
    ) -> Self {
        Self {
            repository,
            hasher,
            codes,
        }
    }

    /// SHA-256 digests and the allow-list from `AUTHORIZATION_CODES`
    pub fn with_defaults(repository: Arc<dyn UserRepository>) -> Self {
        Self::new(
            repository,
            Arc::new(Sha256PasswordHasher),
            AuthorizationCodes::from_env(),
        )
    }

    /// Check `email` and `password` against the stored user.
    ///
    /// Unknown email and wrong password both yield [`AuthError::InvalidCredentials`].
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        validate_email(email).map_err(|e| AuthError::from(e).log())?;

        let digest = self.hasher.hash(password);
        let user = self
            .repository
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::from(e).log())?;

        match user {
            Some(user) if digests_match(&user.password_digest, &digest) => {
                tracing::info!("Login succeeded");
                Ok(user)
            }
            _ => Err(AuthError::InvalidCredentials.log()),
        }
    }

    /// Validate `form` for `action` and apply it.
    ///
    /// Checks run in a fixed order and the first failure is reported: email format,
    /// registration status, name, enterprise, position, authorization code presence,
    /// authorization code validity, password presence, password confirmation. The
    /// repository has the final word on uniqueness, so a lost registration race is
    /// still reported as [`ValidationError::AlreadyRegistered`].
    #[tracing::instrument(skip(self, form), fields(email = %form.email))]
    pub async fn submit(
        &self,
        action: RegistrationAction,
        form: &RegistrationForm,
    ) -> Result<(), AuthError> {
        self.validate(action, form).await.map_err(AuthError::log)?;

        let applied = match action {
            RegistrationAction::Register => {
                let user = NewUser {
                    email: form.email.clone(),
                    name: form.name.clone(),
                    enterprise: form.enterprise.clone(),
                    position: form.position.clone(),
                    permission: form.permission.clone(),
                    exception: form.exception.clone(),
                    authorization_code: form.authorization_code.clone(),
                    password_digest: self.hasher.hash(&form.password),
                };
                self.repository.insert(&user.into()).await
            }
            RegistrationAction::Update => {
                let patch = UserPatch {
                    name: Some(form.name.clone()),
                    enterprise: Some(form.enterprise.clone()),
                    position: Some(form.position.clone()),
                    permission: non_empty(&form.permission),
                    exception: non_empty(&form.exception),
                    authorization_code: Some(form.authorization_code.clone()),
                    password_digest: Some(self.hasher.hash(&form.password)),
                };
                self.repository.update(&form.email, &patch).await
            }
            RegistrationAction::Delete => self.repository.delete(&form.email).await,
        }
        .map_err(|e| AuthError::from(e).log())?;

        if !applied {
            let lost = match action {
                RegistrationAction::Register => ValidationError::AlreadyRegistered,
                RegistrationAction::Update | RegistrationAction::Delete => {
                    ValidationError::NotRegistered
                }
            };
            return Err(AuthError::from(lost).log());
        }

        tracing::info!(action = %action, "Registration action applied");
        Ok(())
    }

    /// Change the fields set in `update` on an existing user
    #[tracing::instrument(skip(self, update))]
    pub async fn update_user(&self, email: &str, update: UserUpdate) -> Result<(), AuthError> {
        validate_email(email).map_err(|e| AuthError::from(e).log())?;

        let password_digest = match update.password.as_deref() {
            Some("") => return Err(AuthError::from(ValidationError::MissingPassword).log()),
            Some(password) => Some(self.hasher.hash(password)),
            None => None,
        };
        let patch = UserPatch {
            name: update.name,
            enterprise: update.enterprise,
            position: update.position,
            permission: update.permission,
            exception: update.exception,
            authorization_code: update.authorization_code,
            password_digest,
        };

        let updated = self
            .repository
            .update(email, &patch)
            .await
            .map_err(|e| AuthError::from(e).log())?;
        if !updated {
            return Err(AuthError::from(ValidationError::NotRegistered).log());
        }

        tracing::info!("User updated");
        Ok(())
    }

    /// Remove an existing user
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email).map_err(|e| AuthError::from(e).log())?;

        let deleted = self
            .repository
            .delete(email)
            .await
            .map_err(|e| AuthError::from(e).log())?;
        if !deleted {
            return Err(AuthError::from(ValidationError::NotRegistered).log());
        }

        tracing::info!("User deleted");
        Ok(())
    }

    async fn validate(
        &self,
        action: RegistrationAction,
        form: &RegistrationForm,
    ) -> Result<(), AuthError> {
        validate_email(&form.email)?;

        let registered = self.repository.find_by_email(&form.email).await?.is_some();
        match action {
            RegistrationAction::Register if registered => {
                return Err(ValidationError::AlreadyRegistered.into());
            }
            RegistrationAction::Update | RegistrationAction::Delete if !registered => {
                return Err(ValidationError::NotRegistered.into());
            }
            _ => {}
        }

        validate_form_fields(action, form, &self.codes)?;
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
