//! Login and registration coordination
//!
//! Ties the user repository, password hashing and the authorization allow-list to
//! the per-visitor session facade.
//!
//! - `credentials`: password hasher and authorization codes
//! - `errors`: user-facing validation and auth errors
//! - `panel`: the `LoginPanel` entry point used by host adapters
//! - `registration`: login check and the register / update / delete workflow
//! - `validation`: email format and form field checks

mod credentials;
mod errors;
mod panel;
mod registration;
mod validation;

pub use credentials::{AuthorizationCodes, PasswordHasher, Sha256PasswordHasher};
pub use errors::{AuthError, ValidationError};
pub use panel::{LOGIN_REQUIRED_NOTICE, LoginPanel, PanelStatus};
pub use registration::{RegistrationAction, RegistrationForm, RegistrationWorkflow, UserUpdate};
pub use validation::is_valid_email;
