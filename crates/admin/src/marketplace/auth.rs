//! Admin login and logout against the marketplace API.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::AdminUser;

const LOGIN_PATH: &str = "/admin/login";
const LOGOUT_PATH: &str = "/admin/logout";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Tokens and user record returned by a successful login.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AdminUser,
}

impl std::fmt::Debug for LoginSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginSession")
            .field("token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user.email)
            .finish()
    }
}

impl ApiClient {
    /// Exchange admin credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for bad credentials, or any transport error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, ApiError> {
        self.post(None, LOGIN_PATH, &LoginRequest { email, password })
            .await
    }

    /// Invalidate `token` on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Callers treat this as best effort.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post(Some(token), LOGOUT_PATH, &serde_json::json!({}))
            .await
            .or_else(|e| match e {
                // Some deployments answer logout with an empty envelope
                ApiError::Parse(_) => Ok(serde_json::Value::Null),
                other => Err(other),
            })?;
        Ok(())
    }
}
