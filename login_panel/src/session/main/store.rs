use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::SESSION_TIMEOUT;
use crate::session::types::{SessionSnapshot, SessionState, SessionToken};

/// Process-wide session store, created on first use
pub static SESSION_STORE: LazyLock<Arc<SessionStore>> = LazyLock::new(|| {
    tracing::info!(
        timeout_secs = *SESSION_TIMEOUT,
        "Initializing process-wide session store"
    );
    Arc::new(SessionStore::new(*SESSION_TIMEOUT))
});

/// Source of the current time for expiry decisions
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The two co-indexed mappings. A token is a key of `states` if and only if it is a
/// key of `last_access`; every method here keeps that true before returning.
#[derive(Default)]
struct SessionMaps {
    states: HashMap<String, SessionState>,
    last_access: HashMap<String, DateTime<Utc>>,
}

impl SessionMaps {
    fn sweep(&mut self, now: DateTime<Utc>, timeout: Duration) -> usize {
        let expired: Vec<String> = self
            .last_access
            .iter()
            .filter(|(_, at)| now - **at > timeout)
            .map(|(token, _)| token.clone())
            .collect();

        for token in &expired {
            self.states.remove(token);
            self.last_access.remove(token);
        }
        expired.len()
    }

    fn state_mut(&mut self, token: &str, now: DateTime<Utc>) -> &mut SessionState {
        self.last_access.insert(token.to_string(), now);
        self.states.entry(token.to_string()).or_default()
    }
}

/// Registry mapping session tokens to their state bags.
///
/// Every operation runs under one lock and starts with a sweep of idle sessions,
/// so a token is never observed half-evicted and an expired token is
/// indistinguishable from one that was never seen. The lock is only held for
/// map work; callers must not hold a store borrow across I/O.
pub struct SessionStore {
    maps: Mutex<SessionMaps>,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_clock(timeout_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(timeout_secs: u64, clock: Arc<dyn Clock>) -> Self {
        let timeout = i64::try_from(timeout_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            maps: Mutex::new(SessionMaps::default()),
            timeout,
            clock,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Lock the maps after sweeping expired sessions, returning the sweep time
    async fn lock_swept(&self) -> (tokio::sync::MutexGuard<'_, SessionMaps>, DateTime<Utc>) {
        let mut maps = self.maps.lock().await;
        let now = self.clock.now();
        let removed = maps.sweep(now, self.timeout);
        if removed > 0 {
            tracing::debug!(removed, "Swept expired sessions");
        }
        (maps, now)
    }

    /// Register the token if unseen and refresh its last access time
    pub async fn touch(&self, token: &SessionToken) {
        let (mut maps, now) = self.lock_swept().await;
        maps.state_mut(token.as_str(), now);
    }

    /// Whether the token currently has live state
    pub async fn contains(&self, token: &SessionToken) -> bool {
        let (maps, _) = self.lock_swept().await;
        maps.states.contains_key(token.as_str())
    }

    /// Stored value for `key`, or `None` for an unknown token or key
    pub async fn get(&self, token: &SessionToken, key: &str) -> Option<Value> {
        let (maps, _) = self.lock_swept().await;
        maps.states
            .get(token.as_str())
            .and_then(|state| state.get(key))
            .cloned()
    }

    /// Stored value for `key`, or `default`
    pub async fn get_or(&self, token: &SessionToken, key: &str, default: Value) -> Value {
        self.get(token, key).await.unwrap_or(default)
    }

    /// Store a value, creating the token's state bag if needed
    pub async fn set(&self, token: &SessionToken, key: &str, value: Value) {
        self.update(token, |state| {
            state.insert(key.to_string(), value);
        })
        .await;
    }

    /// Run `f` on the token's state bag in one critical section, creating the bag if
    /// needed and refreshing the last access time.
    pub async fn update<F, R>(&self, token: &SessionToken, f: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let (mut maps, now) = self.lock_swept().await;
        f(maps.state_mut(token.as_str(), now))
    }

    /// Run `f` on the token's state bag, if any, in one critical section without
    /// creating or refreshing anything.
    pub async fn read<F, R>(&self, token: &SessionToken, f: F) -> R
    where
        F: FnOnce(Option<&SessionState>) -> R,
    {
        let (maps, _) = self.lock_swept().await;
        f(maps.states.get(token.as_str()))
    }

    /// Empty the token's state bag and refresh its last access time.
    /// The token itself stays registered; unknown tokens are left alone.
    pub async fn clear(&self, token: &SessionToken) {
        let (mut guard, now) = self.lock_swept().await;
        let maps = &mut *guard;
        if let Some(state) = maps.states.get_mut(token.as_str()) {
            state.clear();
            maps.last_access.insert(token.as_str().to_string(), now);
        }
    }

    /// Remove every session idle for longer than the timeout as of `now`
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let removed = self.maps.lock().await.sweep(now, self.timeout);
        if removed > 0 {
            tracing::debug!(removed, "Swept expired sessions");
        }
        removed
    }

    /// Number of live sessions
    pub async fn count(&self) -> usize {
        let (maps, _) = self.lock_swept().await;
        maps.states.len()
    }

    /// Deep copy of every live session. Mutating the result never affects the store.
    pub async fn snapshot(&self) -> HashMap<String, SessionSnapshot> {
        let (maps, _) = self.lock_swept().await;
        maps.states
            .iter()
            .filter_map(|(token, state)| {
                maps.last_access.get(token).map(|at| {
                    (
                        token.clone(),
                        SessionSnapshot {
                            state: state.clone(),
                            last_access: *at,
                        },
                    )
                })
            })
            .collect()
    }

    /// Sweep periodically in the background on the current tokio runtime.
    ///
    /// The task holds only a weak reference and ends once the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, period: std::time::Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    tracing::debug!("Session store dropped, stopping sweeper");
                    break;
                };
                let now = store.clock.now();
                store.sweep_expired(now).await;
            }
        })
    }
}
