//! Central configuration for the login_panel crate

use std::sync::LazyLock;

/// Idle time, in seconds, after which a session is swept.
/// Default: 3600 (one hour)
pub static SESSION_TIMEOUT: LazyLock<u64> =
    LazyLock::new(|| parse_secs(std::env::var("SESSION_TIMEOUT").ok(), 3600));

/// Name of the URL query parameter that carries the session token.
/// Default: "session_id"
pub static SESSION_QUERY_PARAM: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_QUERY_PARAM").unwrap_or_else(|_| "session_id".to_string())
});

/// Seconds between two background sweeps. Zero disables the background sweeper,
/// leaving only the lazy sweep done by store operations.
/// Default: 60
pub static SESSION_SWEEP_INTERVAL: LazyLock<u64> =
    LazyLock::new(|| parse_secs(std::env::var("SESSION_SWEEP_INTERVAL").ok(), 60));

/// Comma separated allow-list of authorization codes accepted by the
/// registration workflow.
pub(crate) static AUTHORIZATION_CODES: LazyLock<Vec<String>> = LazyLock::new(|| {
    let codes = parse_code_list(&std::env::var("AUTHORIZATION_CODES").unwrap_or_default());
    if codes.is_empty() {
        tracing::warn!("AUTHORIZATION_CODES is empty; every authorization code will be rejected");
    }
    codes
});

fn parse_secs(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

pub(crate) fn parse_code_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
