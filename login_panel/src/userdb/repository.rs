use async_trait::async_trait;

use crate::userdb::errors::UserError;
use crate::userdb::types::{UserPatch, UserRecord};

/// Persistence for user records, keyed by email.
///
/// Implementations must make `insert` the authoritative uniqueness check: when two
/// registrations for the same email race, exactly one insert returns `true`.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError>;

    /// Store `user`. Returns `false` if the email is already taken.
    async fn insert(&self, user: &UserRecord) -> Result<bool, UserError>;

    /// Apply the fields set in `patch`. Returns `false` if no user has `email`.
    async fn update(&self, email: &str, patch: &UserPatch) -> Result<bool, UserError>;

    /// Returns `false` if no user has `email`.
    async fn delete(&self, email: &str) -> Result<bool, UserError>;
}
