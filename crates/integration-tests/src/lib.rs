//! Shared helpers for DashDesk admin integration tests.
//!
//! Each test spawns the full application (every middleware layer, mock data
//! source) on an ephemeral port and talks to it over HTTP with a cookie-aware
//! client that does not follow redirects.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode, redirect};
use tokio::net::TcpListener;

use dashdesk_admin::build_app;
use dashdesk_admin::config::AdminConfig;
use dashdesk_admin::state::AppState;

/// Password shared by every account in the bundled mock dataset.
pub const DEMO_PASSWORD: &str = "dashdesk-demo";

/// Super admin with every permission.
pub const SUPER_ADMIN: &str = "superadmin@dashdesk.dev";

/// Support agent: customers, orders and tickets only.
pub const SUPPORT_AGENT: &str = "support@dashdesk.dev";

/// A running admin server plus a client holding its session cookie.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

impl TestApp {
    /// Start a fresh server over a fresh copy of the mock dataset.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let base_url = format!("http://{addr}");

        let state = AppState::new(AdminConfig::mock(&base_url)).expect("Failed to build state");
        tokio::spawn(async move {
            axum::serve(listener, build_app(state))
                .await
                .expect("Test server failed");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Start a server and sign in as `email`.
    pub async fn signed_in(email: &str) -> Self {
        let app = Self::spawn().await;
        let response = app.login(email, DEMO_PASSWORD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login as {email} failed");
        app
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/auth/login", &[("email", email), ("password", password)])
            .await
    }

    /// GET `path` and return the body, asserting a 200.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        response.text().await.expect("Failed to read body")
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Response has no Location header")
}
