use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

use crate::session::main::store::Clock;
use crate::session::types::SessionToken;

/// Clock that only moves when told to
pub(crate) struct ManualClock {
    base: DateTime<Utc>,
    offset_secs: AtomicI64,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            base: Utc::now(),
            offset_secs: AtomicI64::new(0),
        }
    }

    pub(crate) fn advance(&self, secs: i64) {
        self.offset_secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + Duration::seconds(self.offset_secs.load(Ordering::SeqCst))
    }
}

/// Well-formed token derived from a readable seed
pub(crate) fn token(seed: &str) -> SessionToken {
    SessionToken::parse(&format!("test-token-{seed}")).expect("seed must be URL-safe")
}
