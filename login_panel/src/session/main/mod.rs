mod facade;
mod identity;
mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use facade::AuthSession;
pub use identity::{Interaction, RequestContext, resolve_session_token};
pub use store::{Clock, SESSION_STORE, SessionStore, SystemClock};
