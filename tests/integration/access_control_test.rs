use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{flash_after, json_body, location, TestApp, ADMIN_IDENTIFIER, ADMIN_PASSWORD};

/// Instructor session plus two clients: 1 linked to jane@example.com, 2 unlinked
async fn roster(app: &TestApp) -> Vec<String> {
    app.register("55511112222", "pw", "instructor").await;
    app.register("jane@example.com", "pw", "student").await;
    let session = vec![app.login("55511112222", "pw").await];

    let response = app
        .post_form(
            "/clients",
            "name=Jane&goal=Hypertrophy&student=jane%40example.com",
            &session,
        )
        .await;
    assert_eq!(location(&response), "/clients/1/workouts");
    app.post_form("/clients", "name=John&goal=Cut", &session).await;

    session
}

#[tokio::test]
async fn test_student_sees_only_linked_client() {
    let app = TestApp::new().await;
    roster(&app).await;
    let student = vec![app.login("jane@example.com", "pw").await];

    let response = app.get("/clients/1/workouts", &student).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/clients/1/progress", &student).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/clients/2/workouts", &student).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/student");
    assert_eq!(
        flash_after(&app, &response, &student).await.as_deref(),
        Some("Access denied. You can only view your own training record.")
    );

    let response = app.get("/clients/2/progress", &student).await;
    assert_eq!(location(&response), "/student");
}

#[tokio::test]
async fn test_student_area() {
    let app = TestApp::new().await;
    roster(&app).await;
    let student = vec![app.login("jane@example.com", "pw").await];

    let page = json_body(app.get("/student", &student).await).await;
    assert_eq!(page["view"], "student");
    assert_eq!(page["data"]["account"]["identifier"], "jane@example.com");
    assert_eq!(page["data"]["account"]["payment_status"], "Pending");
    assert_eq!(page["data"]["client"]["id"], 1);
}

#[tokio::test]
async fn test_student_cannot_reach_staff_routes() {
    let app = TestApp::new().await;
    roster(&app).await;
    let student = vec![app.login("jane@example.com", "pw").await];

    for uri in ["/", "/clients/new", "/payments", "/admin/accounts"] {
        let response = app.get(uri, &student).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/student", "{}", uri);
    }

    let response = app
        .post_form(
            "/clients/1/workouts/exercises",
            "plan=A&exercise=Supino+Reto&sets=3&reps=10",
            &student,
        )
        .await;
    assert_eq!(location(&response), "/student");
    assert_eq!(
        flash_after(&app, &response, &student).await.as_deref(),
        Some("Access denied. This area requires the instructor role.")
    );
    assert!(app.state.clients.get(1).await.unwrap().workouts.is_empty());

    // Students may still record their own measurements
    let response = app
        .post_form("/clients/1/progress", "weight=61.2", &student)
        .await;
    assert_eq!(location(&response), "/clients/1/progress");
    assert_eq!(app.state.clients.get(1).await.unwrap().progress.len(), 1);

    let response = app
        .post_form("/clients/2/progress", "weight=61.2", &student)
        .await;
    assert_eq!(location(&response), "/student");
    assert!(app.state.clients.get(2).await.unwrap().progress.is_empty());
}

#[tokio::test]
async fn test_staff_is_kept_out_of_student_and_admin_areas() {
    let app = TestApp::new().await;
    let instructor = roster(&app).await;

    let response = app.get("/student", &instructor).await;
    assert_eq!(location(&response), "/");

    let response = app.get("/admin/accounts", &instructor).await;
    assert_eq!(location(&response), "/");
    assert_eq!(
        flash_after(&app, &response, &instructor).await.as_deref(),
        Some("Access denied. This area requires the admin role.")
    );

    // Admin outranks instructor
    let admin = vec![app.login(ADMIN_IDENTIFIER, ADMIN_PASSWORD).await];
    let response = app.get("/clients/2/workouts", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_linked_student_cannot_be_linked_twice() {
    let app = TestApp::new().await;
    let instructor = roster(&app).await;

    let page = json_body(app.get("/clients/new", &instructor).await).await;
    assert!(page["data"]["available_students"].as_array().unwrap().is_empty());

    let response = app
        .post_form(
            "/clients",
            "name=Other&goal=Cut&student=jane%40example.com",
            &instructor,
        )
        .await;
    assert_eq!(location(&response), "/clients/new");
    assert_eq!(app.state.clients.list().await.len(), 2);
}

#[tokio::test]
async fn test_admin_account_management() {
    let app = TestApp::new().await;
    roster(&app).await;
    let student = vec![app.login("jane@example.com", "pw").await];
    let admin = vec![app.login(ADMIN_IDENTIFIER, ADMIN_PASSWORD).await];

    let response = app
        .post_form("/admin/accounts/admin@hashem.local/delete", "", &admin)
        .await;
    assert_eq!(location(&response), "/admin/accounts");
    assert!(app.state.accounts.get(ADMIN_IDENTIFIER).await.is_some());

    let response = app
        .post_form("/admin/accounts/Jane@Example.com/delete", "", &admin)
        .await;
    assert_eq!(location(&response), "/admin/accounts");
    assert!(app.state.accounts.get("jane@example.com").await.is_none());
    assert!(app.state.clients.get(1).await.unwrap().linked_student.is_none());

    // The removed account's session stops working at once
    let response = app.get("/student", &student).await;
    assert_eq!(location(&response), "/login");
}
