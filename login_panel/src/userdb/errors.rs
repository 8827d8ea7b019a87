use thiserror::Error;

use crate::storage::StorageError;

#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum UserError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                UserError::InvalidData(err.to_string())
            }
            other => UserError::Storage(other.to_string()),
        }
    }
}

impl From<StorageError> for UserError {
    fn from(err: StorageError) -> Self {
        UserError::Storage(err.to_string())
    }
}
