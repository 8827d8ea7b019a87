use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A registered user of the panel
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct UserRecord {
    /// Database-assigned sequence number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i64>,
    /// Unique login identifier, compared as-is
    pub email: String,
    pub name: String,
    pub enterprise: String,
    pub position: String,
    /// Role tag copied into the session on login
    pub permission: String,
    /// Exception flag copied into the session on login
    pub exception: String,
    /// Authorization code presented at registration or last update
    pub authorization_code: String,
    /// Output of the configured password hasher, never the plain password
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for a user that is about to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub enterprise: String,
    pub position: String,
    pub permission: String,
    pub exception: String,
    pub authorization_code: String,
    pub password_digest: String,
}

impl From<NewUser> for UserRecord {
    fn from(user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            sequence_number: None,
            email: user.email,
            name: user.name,
            enterprise: user.enterprise,
            position: user.position,
            permission: user.permission,
            exception: user.exception,
            authorization_code: user.authorization_code,
            password_digest: user.password_digest,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a user. `None` leaves the stored value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub enterprise: Option<String>,
    pub position: Option<String>,
    pub permission: Option<String>,
    pub exception: Option<String>,
    pub authorization_code: Option<String>,
    pub password_digest: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the set fields into `user` and bump its update time
    pub fn apply_to(&self, user: &mut UserRecord) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                target.clone_from(v);
            }
        }

        set(&mut user.name, &self.name);
        set(&mut user.enterprise, &self.enterprise);
        set(&mut user.position, &self.position);
        set(&mut user.permission, &self.permission);
        set(&mut user.exception, &self.exception);
        set(&mut user.authorization_code, &self.authorization_code);
        set(&mut user.password_digest, &self.password_digest);
        user.updated_at = Utc::now();
    }
}

#[cfg(test)]
pub(crate) fn sample_user(email: &str) -> UserRecord {
    NewUser {
        email: email.to_string(),
        name: "Alice".to_string(),
        enterprise: "ACME".to_string(),
        position: "Engineer".to_string(),
        permission: "admin".to_string(),
        exception: "none".to_string(),
        authorization_code: "CODE-1".to_string(),
        password_digest: "digest".to_string(),
    }
    .into()
}
