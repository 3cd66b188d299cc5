//! Unified error handling for admin.
//!
//! Handlers still render a full page for every failure, so an [`AppError`]
//! is not a response by itself. It decides the status, the heading and the
//! message shown to the admin, and reports server-side failures to Sentry
//! before the page goes out (see `routes::layout::render_app_error`).

use axum::http::StatusCode;
use thiserror::Error;

use dashdesk_core::Permission;

use crate::marketplace::ApiError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Marketplace API call failed.
    #[error("Marketplace error: {0}")]
    Api(#[from] ApiError),

    /// The session store refused a read or write.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The signed-in admin lacks the permission for this section.
    #[error("Forbidden: missing {}", .0.as_str())]
    Forbidden(Permission),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Api(ApiError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Api(ApiError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Api(ApiError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Error page heading.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::Api(ApiError::NotFound(_)) => "Not found",
            Self::Api(ApiError::Unauthorized) => "Session expired",
            Self::Api(_) => "Marketplace unavailable",
            Self::Session(_) => "Something went wrong",
            Self::Forbidden(_) => "Access denied",
        }
    }

    /// Message safe to show to the admin.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Session(_) => "Your session could not be saved. Please try again.".to_string(),
            Self::Forbidden(permission) => format!(
                "Your account does not have the \"{}\" permission.",
                permission.label()
            ),
        }
    }

    /// Log the error and, for server-side failures, send it to Sentry.
    ///
    /// Returns the Sentry event id when one was captured.
    pub fn report(&self) -> Option<sentry::types::Uuid> {
        if !self.status().is_server_error() {
            tracing::warn!(error = %self, "Admin request failed");
            return None;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Admin request error"
        );
        Some(event_id)
    }
}

/// Set the Sentry user context for the signed-in admin.
pub fn set_sentry_user(admin_user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use dashdesk_core::ValidationErrors;

    use super::*;

    #[test]
    fn test_api_errors_map_to_gateway_statuses() {
        assert_eq!(AppError::from(ApiError::Unauthorized).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(ApiError::NotFound("customer cus_1".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ApiError::Validation(ValidationErrors::single("email", "bad"))).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(ApiError::Api {
                status: 500,
                message: "boom".into()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Forbidden(Permission::ManageUsers).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_public_messages() {
        let err = AppError::from(ApiError::RateLimited(9));
        assert_eq!(err.heading(), "Marketplace unavailable");
        assert_eq!(err.public_message(), "Too many requests, try again in 9s");

        let err = AppError::Forbidden(Permission::ViewReports);
        assert_eq!(err.to_string(), "Forbidden: missing view_reports");
        assert_eq!(
            err.public_message(),
            "Your account does not have the \"View reports\" permission."
        );
    }

    #[test]
    fn test_only_server_errors_are_captured() {
        assert!(AppError::Forbidden(Permission::ManageUsers).report().is_none());
        assert!(
            AppError::from(ApiError::NotFound("order ord_1".into()))
                .report()
                .is_none()
        );
        assert!(
            AppError::from(ApiError::Parse("not json".into()))
                .report()
                .is_some()
        );
    }
}
