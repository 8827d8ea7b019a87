//! Data store selection

use std::{env, fmt, str::FromStr, sync::Arc, sync::LazyLock};

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};
use crate::storage::errors::StorageError;

// Configuration
static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").unwrap_or_else(|_| "memory".to_string())
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
});

/// Table prefix from environment variable
pub static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "panel_".to_string()));

/// Backend holding the user records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStoreKind {
    /// Process memory, lost on restart
    Memory,
    Sqlite,
    Postgres,
}

impl FromStr for DataStoreKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "postgres" => Ok(Self::Postgres),
            t => Err(StorageError::Config(format!(
                "Unsupported store type: {t}. Supported types are 'memory', 'sqlite' and 'postgres'"
            ))),
        }
    }
}

impl fmt::Display for DataStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        };
        f.write_str(name)
    }
}

/// Open a lazily connecting pool for `kind`.
///
/// Returns `None` for [`DataStoreKind::Memory`], which needs no SQL backend.
pub fn connect_data_store(
    kind: DataStoreKind,
    url: &str,
) -> Result<Option<Arc<dyn DataStore>>, StorageError> {
    tracing::info!(store_type = %kind, "Initializing data store");

    let store: Arc<dyn DataStore> = match kind {
        DataStoreKind::Memory => return Ok(None),
        DataStoreKind::Sqlite => {
            let opts = SqliteConnectOptions::from_str(url)
                .map_err(|e| StorageError::Config(format!("Invalid SQLite URL: {e}")))?
                .create_if_missing(true);

            // Every connection to an in-memory database sees its own empty database,
            // so keep exactly one connection alive for the life of the pool.
            let pool = if url.contains(":memory:") {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_lazy_with(opts)
            } else {
                SqlitePoolOptions::new().connect_lazy_with(opts)
            };
            Arc::new(SqliteDataStore::new(pool))
        }
        DataStoreKind::Postgres => {
            let pool = PgPoolOptions::new()
                .connect_lazy(url)
                .map_err(|e| StorageError::Config(format!("Invalid Postgres URL: {e}")))?;
            Arc::new(PostgresDataStore::new(pool))
        }
    };

    tracing::info!(store_type = %kind, "Data store pool created");
    Ok(Some(store))
}

/// Build the data store described by `GENERIC_DATA_STORE_TYPE` and `GENERIC_DATA_STORE_URL`
pub fn data_store_from_env() -> Result<Option<Arc<dyn DataStore>>, StorageError> {
    let kind: DataStoreKind = GENERIC_DATA_STORE_TYPE.parse()?;
    connect_data_store(kind, GENERIC_DATA_STORE_URL.as_str())
}
