use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::userdb::errors::UserError;
use crate::userdb::repository::UserRepository;
use crate::userdb::types::{UserPatch, UserRecord};

#[derive(Default)]
struct Users {
    by_email: HashMap<String, UserRecord>,
    last_sequence: i64,
}

/// User repository kept in process memory
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Users>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError> {
        Ok(self.users.lock().await.by_email.get(email).cloned())
    }

    async fn insert(&self, user: &UserRecord) -> Result<bool, UserError> {
        let mut users = self.users.lock().await;
        if users.by_email.contains_key(&user.email) {
            return Ok(false);
        }
        users.last_sequence += 1;
        let mut stored = user.clone();
        stored.sequence_number = Some(users.last_sequence);
        users.by_email.insert(stored.email.clone(), stored);
        Ok(true)
    }

    async fn update(&self, email: &str, patch: &UserPatch) -> Result<bool, UserError> {
        let mut users = self.users.lock().await;
        match users.by_email.get_mut(email) {
            Some(user) => {
                patch.apply_to(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, email: &str) -> Result<bool, UserError> {
        Ok(self.users.lock().await.by_email.remove(email).is_some())
    }
}
