use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let error = StorageError::Storage("Connection failed".to_string());
        assert_eq!(error.to_string(), "Storage error: Connection failed");

        let error = StorageError::Config("bad url".to_string());
        assert_eq!(error.to_string(), "Storage configuration error: bad url");
    }

    #[test]
    fn test_from_sqlx_error() {
        let storage_error = StorageError::from(sqlx::Error::RowNotFound);
        match storage_error {
            StorageError::Storage(msg) => assert!(msg.contains("no rows")),
            _ => panic!("Expected Storage variant"),
        }
    }
}
