use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use login_panel::{
    AuthorizationCodes, Clock, InMemoryUserRepository, LoginPanel, RegistrationForm,
    RegistrationWorkflow, SessionStore, Sha256PasswordHasher, UserError, UserPatch, UserRecord,
    UserRepository,
};

pub const VALID_CODE: &str = "PANEL-2024";

/// Clock that only moves when told to
pub struct ManualClock {
    base: DateTime<Utc>,
    offset_secs: AtomicI64,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base: Utc::now(),
            offset_secs: AtomicI64::new(0),
        })
    }

    pub fn advance(&self, secs: i64) {
        self.offset_secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + Duration::seconds(self.offset_secs.load(Ordering::SeqCst))
    }
}

/// In-memory repository that counts every call made to it
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryUserRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for CountingRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError> {
        self.record();
        self.inner.find_by_email(email).await
    }

    async fn insert(&self, user: &UserRecord) -> Result<bool, UserError> {
        self.record();
        self.inner.insert(user).await
    }

    async fn update(&self, email: &str, patch: &UserPatch) -> Result<bool, UserError> {
        self.record();
        self.inner.update(email, patch).await
    }

    async fn delete(&self, email: &str) -> Result<bool, UserError> {
        self.record();
        self.inner.delete(email).await
    }
}

/// Repository whose backend is always down
pub struct FailingRepository;

#[async_trait]
impl UserRepository for FailingRepository {
    async fn find_by_email(&self, _email: &str) -> Result<Option<UserRecord>, UserError> {
        Err(UserError::Storage("connection refused by db.internal:5432".to_string()))
    }

    async fn insert(&self, _user: &UserRecord) -> Result<bool, UserError> {
        Err(UserError::Storage("connection refused by db.internal:5432".to_string()))
    }

    async fn update(&self, _email: &str, _patch: &UserPatch) -> Result<bool, UserError> {
        Err(UserError::Storage("connection refused by db.internal:5432".to_string()))
    }

    async fn delete(&self, _email: &str) -> Result<bool, UserError> {
        Err(UserError::Storage("connection refused by db.internal:5432".to_string()))
    }
}

pub fn panel_with(
    repository: Arc<dyn UserRepository>,
    sessions: Arc<SessionStore>,
) -> LoginPanel {
    let workflow = RegistrationWorkflow::new(
        repository,
        Arc::new(Sha256PasswordHasher),
        AuthorizationCodes::new([VALID_CODE]),
    );
    LoginPanel::new(sessions, workflow)
}

pub fn panel() -> LoginPanel {
    panel_with(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(SessionStore::new(3600)),
    )
}

pub fn registration_form(email: &str) -> RegistrationForm {
    RegistrationForm {
        email: email.to_string(),
        name: "Alice".to_string(),
        enterprise: "ACME".to_string(),
        position: "Engineer".to_string(),
        permission: "admin".to_string(),
        exception: "none".to_string(),
        authorization_code: VALID_CODE.to_string(),
        password: "secret".to_string(),
        confirm_password: "secret".to_string(),
    }
}
