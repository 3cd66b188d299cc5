//! Page chrome shared by every signed-in page: navigation, the admin badge
//! and the pending toast.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use dashdesk_core::route_permission;

use crate::error::AppError;
use crate::filters;
use crate::middleware::take_toast;
use crate::models::{AuthState, CurrentAdmin, Toast};

/// Sidebar sections in display order.
const NAVIGATION: &[(&str, &str)] = &[
    ("/", "Dashboard"),
    ("/orders", "Orders"),
    ("/customers", "Customers"),
    ("/merchants", "Merchants"),
    ("/riders", "Riders"),
    ("/promotions", "Promotions"),
    ("/banners", "Banners"),
    ("/categories", "Categories"),
    ("/subcategories", "Subcategories"),
    ("/recipes", "Recipes"),
    ("/support", "Support tickets"),
    ("/users", "Admin users"),
];

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Sections `admin` may open, with the one containing `current_path` marked.
#[must_use]
pub fn navigation(admin: &CurrentAdmin, current_path: &str) -> Vec<NavItem> {
    NAVIGATION
        .iter()
        .filter(|(href, _)| route_permission(href).is_none_or(|p| admin.can(p)))
        .map(|&(href, label)| NavItem {
            href,
            label,
            active: if href == "/" {
                current_path == "/"
            } else {
                current_path
                    .strip_prefix(href)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            },
        })
        .collect()
}

/// Signed-in admin as shown in the header.
#[derive(Debug, Clone)]
pub struct AdminView {
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub initials: String,
}

impl From<&CurrentAdmin> for AdminView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.clone(),
            role: admin.role.label(),
            initials: admin.initials(),
        }
    }
}

/// Layout data every page template carries.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub title: String,
    pub admin: AdminView,
    pub nav: Vec<NavItem>,
    pub toast: Option<Toast>,
}

impl PageContext {
    /// Build the layout for `current_path`, consuming the pending toast.
    pub async fn new(session: &Session, auth: &AuthState, current_path: &str, title: &str) -> Self {
        Self {
            title: title.to_string(),
            admin: AdminView::from(&auth.user),
            nav: navigation(&auth.user, current_path),
            toast: take_toast(session).await,
        }
    }
}

/// Full-page error (403, 404, upstream failures).
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub ctx: PageContext,
    pub status: u16,
    pub heading: String,
    pub message: String,
}

/// Render the error page with `status`.
pub async fn render_error_page(
    session: &Session,
    auth: &AuthState,
    status: StatusCode,
    heading: &str,
    message: &str,
) -> Response {
    let template = ErrorTemplate {
        ctx: PageContext::new(session, auth, "", heading).await,
        status: status.as_u16(),
        heading: heading.to_string(),
        message: message.to_string(),
    };
    (status, template).into_response()
}

/// Report `error` and render it as the error page.
pub async fn render_app_error(session: &Session, auth: &AuthState, error: &AppError) -> Response {
    error.report();
    render_error_page(
        session,
        auth,
        error.status(),
        error.heading(),
        &error.public_message(),
    )
    .await
}
