mod errors;
mod memory;
mod repository;
mod storage;
mod types;

use std::sync::Arc;

pub use errors::UserError;
pub use memory::InMemoryUserRepository;
pub use repository::UserRepository;
pub use storage::UserStore;
pub use types::{NewUser, UserPatch, UserRecord};

#[cfg(test)]
pub(crate) use types::sample_user;

use crate::storage::data_store_from_env;

/// Build the user repository selected by `GENERIC_DATA_STORE_TYPE`, creating the
/// users table when a SQL backend is configured.
pub async fn repository_from_env() -> Result<Arc<dyn UserRepository>, UserError> {
    match data_store_from_env()? {
        Some(store) => Ok(Arc::new(UserStore::new(store).await?)),
        None => {
            tracing::warn!("Using the in-memory user repository; users are lost on restart");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
    }
}
