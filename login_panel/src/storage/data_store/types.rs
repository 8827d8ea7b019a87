use sqlx::{Pool, Postgres, Sqlite};

/// SQLite pool holding the users table
#[derive(Clone, Debug)]
pub struct SqliteDataStore {
    pool: sqlx::SqlitePool,
}

/// PostgreSQL pool holding the users table
#[derive(Clone, Debug)]
pub struct PostgresDataStore {
    pool: sqlx::PgPool,
}

impl SqliteDataStore {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

impl PostgresDataStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

/// SQL backend handed to [`UserStore`](crate::UserStore).
///
/// Exactly one of the accessors returns a pool. `UserStore` picks the matching
/// query set from it, so supporting another database means adding an accessor here
/// and a query module under `userdb/storage`.
pub trait DataStore: Send + Sync {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
}

impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }
}
