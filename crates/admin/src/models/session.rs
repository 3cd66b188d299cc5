//! Session-related types for admin authentication.
//!
//! The auth state is replaced wholesale on login and removed on logout.
//! Tokens are never refreshed here; when the API rejects one, the admin is
//! sent back to the login page.

use serde::{Deserialize, Serialize};

use dashdesk_core::{AdminRole, AdminUserId, Permission, Permissions};

use super::AdminUser;
use crate::marketplace::LoginSession;

/// Session-stored admin identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's id on the marketplace API.
    pub id: AdminUserId,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    /// Permission flags copied from the user record at login.
    pub permissions: Permissions,
}

impl CurrentAdmin {
    #[must_use]
    pub const fn can(&self, permission: Permission) -> bool {
        self.permissions.has(permission)
    }

    /// Initials for the avatar bubble.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            permissions: user.permissions,
        }
    }
}

/// Everything the session knows about the signed-in admin.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthState {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: CurrentAdmin,
    pub is_authenticated: bool,
}

impl AuthState {
    /// State after a successful login.
    #[must_use]
    pub fn from_login(login: &LoginSession) -> Self {
        Self {
            token: login.token.clone(),
            refresh_token: login.refresh_token.clone(),
            user: CurrentAdmin::from(&login.user),
            is_authenticated: true,
        }
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("is_authenticated", &self.is_authenticated)
            .finish()
    }
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One-shot notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for the [`super::AuthState`] of the signed-in admin.
    pub const AUTH: &str = "auth";

    /// Key for the pending [`super::Toast`].
    pub const TOAST: &str = "toast";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn admin(name: &str) -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::new("adm_1"),
            email: "ops@dashdesk.dev".into(),
            name: name.into(),
            role: AdminRole::Support,
            permissions: Permissions::for_role(AdminRole::Support),
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(admin("grace hopper").initials(), "GH");
        assert_eq!(admin("Ada Byron Lovelace").initials(), "AB");
        assert_eq!(admin("Cher").initials(), "C");
    }

    #[test]
    fn test_can_uses_flags() {
        let admin = admin("Grace");
        assert!(admin.can(Permission::ManageOrders));
        assert!(!admin.can(Permission::ManageUsers));
    }

    #[test]
    fn test_auth_state_debug_redacts_tokens() {
        let state = AuthState {
            token: "tok-secret".into(),
            refresh_token: Some("ref-secret".into()),
            user: admin("Grace"),
            is_authenticated: true,
        };
        let debug = format!("{state:?}");
        assert!(!debug.contains("tok-secret"));
        assert!(!debug.contains("ref-secret"));
    }

    #[test]
    fn test_auth_state_round_trips_through_session_json() {
        let state = AuthState {
            token: "tok".into(),
            refresh_token: None,
            user: admin("Grace"),
            is_authenticated: true,
        };
        let value = serde_json::to_value(&state).unwrap();
        let back: AuthState = serde_json::from_value(value).unwrap();
        assert_eq!(back.user, state.user);
    }
}
