//! Route guard enforcing section permissions.
//!
//! Runs inside the session layer. Anonymous requests pass through untouched
//! so the handler's auth extractor can redirect them to the login page.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use dashdesk_core::route_permission;

use super::auth::current_auth;
use crate::error::AppError;
use crate::routes::layout::render_app_error;

/// Respond 403 when the signed-in admin lacks the permission for the path.
pub async fn require_route_permission(request: Request, next: Next) -> Response {
    let Some(permission) = route_permission(request.uri().path()) else {
        return next.run(request).await;
    };

    let Some(session) = request.extensions().get::<Session>().cloned() else {
        return next.run(request).await;
    };

    match current_auth(&session).await {
        Some(auth) if !auth.user.can(permission) => {
            render_app_error(&session, &auth, &AppError::Forbidden(permission)).await
        }
        _ => next.run(request).await,
    }
}
