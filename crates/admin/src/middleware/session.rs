//! Session middleware configuration for admin.
//!
//! Sessions live in memory: the only state kept is the API token, the admin
//! record returned at login and a pending toast, all of which are cheap to
//! lose on restart.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::AdminConfig;
use crate::models::{Toast, session_keys};

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "dashdesk_session";

/// Session inactivity expiry in seconds (8 hours, one working shift).
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}

/// Queue a toast for the next rendered page.
pub async fn push_toast(session: &Session, toast: Toast) {
    if let Err(e) = session.insert(session_keys::TOAST, toast).await {
        tracing::warn!(error = %e, "Failed to store toast");
    }
}

/// Take the pending toast, if any.
pub async fn take_toast(session: &Session) -> Option<Toast> {
    session
        .remove::<Toast>(session_keys::TOAST)
        .await
        .ok()
        .flatten()
}
