//! Sign-in, sign-out and session handling.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use dashdesk_integration_tests::{DEMO_PASSWORD, SUPER_ADMIN, TestApp, location};

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");

    assert_eq!(app.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pages_redirect_to_login_when_signed_out() {
    let app = TestApp::spawn().await;

    for path in ["/", "/customers", "/orders/ord_5001", "/users/new"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/auth/login", "{path}");
    }
}

#[tokio::test]
async fn test_login_page_has_security_headers() {
    let app = TestApp::spawn().await;
    let response = app.get("/auth/login").await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("x-request-id"));
    assert!(response.text().await.unwrap().contains("Sign in"));
}

#[tokio::test]
async fn test_login_rejects_bad_input() {
    let app = TestApp::spawn().await;

    let response = app.login("not-an-email", "").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Password is required"));

    let response = app.login(SUPER_ADMIN, "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.text().await.unwrap().contains("Invalid email or password"));

    let response = app.login("former@dashdesk.dev", DEMO_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_then_logout() {
    let app = TestApp::spawn().await;

    let response = app.login(SUPER_ADMIN, DEMO_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let dashboard = app.page("/").await;
    assert!(dashboard.contains("Welcome back, Amara Obi"));
    assert!(dashboard.contains("Recent orders"));
    assert!(dashboard.contains("ORD-261012-183000"));

    // Signed-in admins skip the login form
    let response = app.get("/auth/login").await;
    assert_eq!(location(&response), "/");

    let response = app.post_form("/auth/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
    assert!(app.page("/auth/login").await.contains("You have been signed out"));

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
