//! Authentication extractors for admin.
//!
//! The signed-in admin lives in the session as an [`AuthState`]. Handlers
//! that need it take [`RequireAdminAuth`]; anonymous visitors are sent to the
//! login page.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{AuthState, session_keys};

/// Where anonymous visitors are sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires admin authentication.
pub struct RequireAdminAuth(pub AuthState);

/// Error returned when admin authentication is required but the user is not logged in.
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// No session layer in front of the handler.
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Read the auth state, treating a state with the flag cleared as absent.
pub async fn current_auth(session: &Session) -> Option<AuthState> {
    session
        .get::<AuthState>(session_keys::AUTH)
        .await
        .ok()
        .flatten()
        .filter(|auth| auth.is_authenticated)
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let auth = current_auth(session)
            .await
            .ok_or(AdminAuthRejection::RedirectToLogin)?;

        set_sentry_user(auth.user.id.as_str(), Some(&auth.user.email));
        Ok(Self(auth))
    }
}

/// Extractor that optionally gets the signed-in admin.
pub struct OptionalAdminAuth(pub Option<AuthState>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<Session>() {
            Some(session) => current_auth(session).await,
            None => None,
        };
        Ok(Self(auth))
    }
}

/// Replace the session's auth state after a successful login.
///
/// The session id is cycled so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_state(
    session: &Session,
    auth: &AuthState,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::AUTH, auth).await
}

/// Drop everything the session knows about the admin (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn clear_auth_state(session: &Session) -> Result<(), tower_sessions::session::Error> {
    clear_sentry_user();
    session.flush().await
}
