mod errors;
mod main;
mod types;

pub use errors::SessionError;
pub use main::{
    AuthSession, Clock, Interaction, RequestContext, SESSION_STORE, SessionStore, SystemClock,
    resolve_session_token,
};
pub use types::{Page, PageAccess, SessionSnapshot, SessionState, SessionToken, SessionView};
