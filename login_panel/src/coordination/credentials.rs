//! Password digests and the authorization code allow-list

use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};

use crate::config::AUTHORIZATION_CODES;

/// One-way, deterministic digest used to store and compare passwords
pub trait PasswordHasher: Send + Sync + 'static {
    fn hash(&self, plaintext: &str) -> String;
}

/// Lowercase hex SHA-256 of the UTF-8 password
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PasswordHasher;

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, plaintext: &str) -> String {
        format!("{:x}", Sha256::digest(plaintext.as_bytes()))
    }
}

/// Compare two digests without leaking where they first differ
pub(crate) fn digests_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Configured set of authorization codes accepted by the registration workflow
#[derive(Clone, Default)]
pub struct AuthorizationCodes {
    codes: Vec<String>,
}

impl AuthorizationCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// The allow-list from `AUTHORIZATION_CODES`
    pub fn from_env() -> Self {
        Self::new(AUTHORIZATION_CODES.iter().cloned())
    }

    /// Membership test that compares against every configured code
    pub fn contains(&self, code: &str) -> bool {
        let mut found = Choice::from(0);
        for candidate in &self.codes {
            found |= candidate.as_bytes().ct_eq(code.as_bytes());
        }
        found.into()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl std::fmt::Debug for AuthorizationCodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationCodes")
            .field("count", &self.codes.len())
            .finish()
    }
}
