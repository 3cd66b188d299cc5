//! Section access by permission flag.

use reqwest::StatusCode;

use dashdesk_integration_tests::{SUPPORT_AGENT, TestApp};

#[tokio::test]
async fn test_support_agent_sections() {
    let app = TestApp::signed_in(SUPPORT_AGENT).await;

    for path in ["/customers", "/orders", "/support"] {
        assert_eq!(app.get(path).await.status(), StatusCode::OK, "{path}");
    }

    for path in ["/users", "/users/adm_0001", "/merchants", "/promotions/new"] {
        assert_eq!(app.get(path).await.status(), StatusCode::FORBIDDEN, "{path}");
    }

    let response = app.post_form("/users/adm_0001/delete", &[]).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dashboard_only_shows_permitted_sections() {
    let app = TestApp::signed_in(SUPPORT_AGENT).await;
    let dashboard = app.page("/").await;

    assert!(dashboard.contains("href=\"/customers\""));
    assert!(dashboard.contains("Open tickets"));
    assert!(!dashboard.contains("href=\"/merchants\""));
    assert!(!dashboard.contains("href=\"/users\""));
    assert!(!dashboard.contains("Delivered revenue"));
}
