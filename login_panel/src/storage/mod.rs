mod data_store;
mod errors;

pub use data_store::{
    DB_TABLE_PREFIX, DataStore, DataStoreKind, PostgresDataStore, SqliteDataStore,
    connect_data_store, data_store_from_env,
};
pub use errors::StorageError;
