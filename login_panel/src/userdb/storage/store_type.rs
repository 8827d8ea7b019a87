use std::sync::Arc;

use async_trait::async_trait;

use crate::storage::DataStore;
use crate::userdb::{
    errors::UserError,
    repository::UserRepository,
    types::{UserPatch, UserRecord},
};

use super::postgres::*;
use super::sqlite::*;

/// User repository backed by a SQL data store (sqlite or postgres)
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn DataStore>,
}

impl UserStore {
    /// Wrap `store`, creating the users table if it does not exist yet
    pub async fn new(store: Arc<dyn DataStore>) -> Result<Self, UserError> {
        let user_store = Self { store };
        user_store.init().await?;
        Ok(user_store)
    }

    /// Initialize the user database tables
    async fn init(&self) -> Result<(), UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    #[tracing::instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            find_user_by_email_sqlite(pool, email).await
        } else if let Some(pool) = self.store.as_postgres() {
            find_user_by_email_postgres(pool, email).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(found) => tracing::debug!(found = found.is_some(), "User lookup completed"),
            Err(e) => tracing::error!(error = %e, "User lookup failed"),
        }

        result
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, user: &UserRecord) -> Result<bool, UserError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            insert_user_sqlite(pool, user).await
        } else if let Some(pool) = self.store.as_postgres() {
            insert_user_postgres(pool, user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(inserted) => tracing::debug!(inserted, "User insert completed"),
            Err(e) => tracing::error!(error = %e, "User insert failed"),
        }

        result
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update(&self, email: &str, patch: &UserPatch) -> Result<bool, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            update_user_sqlite(pool, email, patch).await
        } else if let Some(pool) = self.store.as_postgres() {
            update_user_postgres(pool, email, patch).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, email: &str) -> Result<bool, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            delete_user_sqlite(pool, email).await
        } else if let Some(pool) = self.store.as_postgres() {
            delete_user_postgres(pool, email).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}
