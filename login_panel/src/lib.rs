//! login_panel - session identity and user registry for server-rendered panels
//!
//! Every visitor gets an opaque session token that travels in the URL. All
//! per-visitor state (login flag, current page, permission, exception, displayed
//! user name) lives in that token's state bag inside one process-wide store, and
//! idle sessions expire. Registration, update, deletion and login of users go
//! through a validation workflow backed by a pluggable user repository.

mod config;
mod coordination;
mod session;
mod storage;
mod userdb;

use std::sync::Arc;

pub use config::{SESSION_QUERY_PARAM, SESSION_SWEEP_INTERVAL, SESSION_TIMEOUT};

pub use coordination::{
    AuthError, AuthorizationCodes, LOGIN_REQUIRED_NOTICE, LoginPanel, PanelStatus,
    PasswordHasher, RegistrationAction, RegistrationForm, RegistrationWorkflow,
    Sha256PasswordHasher, UserUpdate, ValidationError, is_valid_email,
};

pub use session::{
    AuthSession, Clock, Interaction, Page, PageAccess, RequestContext, SESSION_STORE,
    SessionError, SessionSnapshot, SessionState, SessionStore, SessionToken, SessionView,
    SystemClock, resolve_session_token,
};

pub use storage::{
    DataStore, DataStoreKind, PostgresDataStore, SqliteDataStore, StorageError,
    connect_data_store,
};

pub use userdb::{
    InMemoryUserRepository, NewUser, UserError, UserPatch, UserRecord, UserRepository, UserStore,
};

/// Build a [`LoginPanel`] from the environment.
///
/// Uses the process-wide [`SESSION_STORE`], the user repository selected by
/// `GENERIC_DATA_STORE_TYPE`, SHA-256 password digests and the `AUTHORIZATION_CODES`
/// allow-list. Starts the background sweeper when `SESSION_SWEEP_INTERVAL` is non-zero,
/// so it must be called from inside a tokio runtime.
pub async fn init() -> Result<LoginPanel, AuthError> {
    let repository = userdb::repository_from_env().await?;
    let sessions = Arc::clone(&SESSION_STORE);

    let interval = *SESSION_SWEEP_INTERVAL;
    if interval > 0 {
        sessions.spawn_sweeper(std::time::Duration::from_secs(interval));
    }

    tracing::info!(
        timeout_secs = *SESSION_TIMEOUT,
        sweep_interval_secs = interval,
        "Login panel initialized"
    );
    Ok(LoginPanel::new(
        sessions,
        RegistrationWorkflow::with_defaults(repository),
    ))
}
