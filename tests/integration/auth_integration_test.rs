use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{cookie, flash_after, json_body, location, TestApp, ADMIN_IDENTIFIER, ADMIN_PASSWORD};

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let response = app.get("/health", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["x-content-type-options"],
        "nosniff"
    );

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "hashem-trainer");
}

#[tokio::test]
async fn test_login_page_is_a_view() {
    let app = TestApp::new().await;

    let response = app.get("/login", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = json_body(response).await;
    assert_eq!(page["view"], "login");
    assert!(page["user"].is_null());
    assert!(page["flash"].is_null());
}

#[tokio::test]
async fn test_register_then_login_lands_by_role() {
    let app = TestApp::new().await;

    app.register("55511112222", "pw", "instructor").await;
    app.register("jane@example.com", "pw", "student").await;

    let response = app
        .post_form("/login", "identifier=55511112222&password=pw", &[])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(cookie(&response, "session").is_some());

    let response = app
        .post_form("/login", "identifier=jane%40example.com&password=pw", &[])
        .await;
    assert_eq!(location(&response), "/student");

    let admin = app.login(ADMIN_IDENTIFIER, ADMIN_PASSWORD).await;
    let page = json_body(app.get("/admin/accounts", &[admin]).await).await;
    assert_eq!(page["view"], "accounts");
    assert_eq!(page["data"]["accounts"].as_array().unwrap().len(), 3);
    assert!(page["data"]["accounts"][0]["password_hash"].is_null());
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = TestApp::new().await;
    app.register("55511112222", "pw", "instructor").await;

    let response = app
        .post_form("/login", "identifier=55511112222&password=nope", &[])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(cookie(&response, "session").is_none());

    assert_eq!(
        flash_after(&app, &response, &[]).await.as_deref(),
        Some("Invalid identifier or password")
    );
}

#[tokio::test]
async fn test_duplicate_registration_is_reported() {
    let app = TestApp::new().await;
    app.register("jane@example.com", "pw", "student").await;

    let response = app
        .post_form(
            "/register",
            "identifier=jane%40example.com&name=Jane&password=pw&role=student",
            &[],
        )
        .await;
    assert_eq!(location(&response), "/register");

    let message = flash_after(&app, &response, &[]).await.unwrap();
    assert!(message.contains("already registered"), "{}", message);
}

#[tokio::test]
async fn test_admin_role_cannot_be_self_registered() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/register",
            "identifier=boss%40example.com&name=Boss&password=pw&role=admin",
            &[],
        )
        .await;
    assert_eq!(location(&response), "/register");
    assert!(app.state.accounts.get("boss@example.com").await.is_none());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::new().await;
    app.register("55511112222", "pw", "instructor").await;
    let session = app.login("55511112222", "pw").await;

    let response = app.post_form("/logout", "", &[session]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let cleared = response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .any(|value| value.to_str().unwrap().starts_with("session=;"));
    assert!(cleared);
}

#[tokio::test]
async fn test_unauthenticated_requests_go_to_login() {
    let app = TestApp::new().await;

    for uri in ["/", "/clients/1/workouts", "/payments", "/admin/accounts", "/student"] {
        let response = app.get(uri, &[]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/login", "{}", uri);
    }

    let response = app.get("/", &[]).await;
    assert_eq!(
        flash_after(&app, &response, &[]).await.as_deref(),
        Some("Please log in to continue")
    );

    let response = app.get("/", &["session=not-a-token".to_string()]).await;
    assert_eq!(location(&response), "/login");
}
