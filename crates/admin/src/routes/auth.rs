//! Authentication route handlers for admin.
//!
//! Email and password are exchanged with the marketplace API for a bearer
//! token; the token and user record are kept in the server-side session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use dashdesk_core::{Validate, ValidationErrors, Validator};

use crate::error::AppError;
use crate::filters;
use crate::marketplace::ApiError;
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{
    OptionalAdminAuth, RequireAdminAuth, clear_auth_state, push_toast, set_auth_state, take_toast,
};
use crate::models::{AuthState, Toast};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    /// Failure not tied to a field, e.g. wrong credentials.
    pub error: Option<String>,
    pub toast: Option<Toast>,
}

impl LoginTemplate {
    fn new(email: &str, toast: Option<Toast>) -> Self {
        Self {
            email: email.to_string(),
            email_error: None,
            password_error: None,
            error: None,
            toast,
        }
    }
}

/// Submitted login form.
#[derive(Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("email", &self.email)
            .email("email", &self.email)
            .required("password", &self.password)
            .finish()
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(OptionalAdminAuth(auth): OptionalAdminAuth, session: Session) -> Response {
    if auth.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate::new("", take_toast(&session).await).into_response()
}

/// Exchange credentials for a session.
///
/// POST /auth/login
#[instrument(skip_all, fields(email = %form.email.trim()))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim();

    if let Err(errors) = form.validate() {
        let mut page = LoginTemplate::new(email, None);
        page.email_error = errors.first("email").map(str::to_string);
        page.password_error = errors.first("password").map(str::to_string);
        return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
    }

    let login = match state.backend().login(email, &form.password).await {
        Ok(login) => login,
        Err(ApiError::Unauthorized) => {
            tracing::warn!("Rejected admin login");
            let mut page = LoginTemplate::new(email, None);
            page.error = Some("Invalid email or password".to_string());
            return (StatusCode::UNAUTHORIZED, page).into_response();
        }
        Err(e) => {
            let error = AppError::from(e);
            error.report();
            let mut page = LoginTemplate::new(email, None);
            page.error = Some(error.public_message());
            return (StatusCode::BAD_GATEWAY, page).into_response();
        }
    };

    let auth = AuthState::from_login(&login);
    if let Err(e) = set_auth_state(&session, &auth).await {
        let error = AppError::from(e);
        error.report();
        let mut page = LoginTemplate::new(email, None);
        page.error = Some(error.public_message());
        return (error.status(), page).into_response();
    }

    tracing::info!(admin_id = %auth.user.id, "Admin signed in");
    push_toast(&session, Toast::success(format!("Welcome back, {}", auth.user.name))).await;
    Redirect::to("/").into_response()
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    state.backend().logout(&auth.token).await;

    if let Err(e) = clear_auth_state(&session).await {
        AppError::from(e).report();
    }
    tracing::info!(admin_id = %auth.user.id, "Admin signed out");
    push_toast(&session, Toast::success("You have been signed out")).await;
    Redirect::to(LOGIN_PATH).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_rules() {
        let form = LoginForm {
            email: "ops.dashdesk.dev".into(),
            password: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("email"));
        assert_eq!(errors.first("password"), Some("Password is required"));
    }

    #[test]
    fn test_login_form_debug_hides_password() {
        let form = LoginForm {
            email: "ops@dashdesk.dev".into(),
            password: "dashdesk-demo".into(),
        };
        assert!(!format!("{form:?}").contains("dashdesk-demo"));
    }
}
