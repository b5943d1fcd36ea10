//! Sign up, login, logout and route guarding.

use axum::http::StatusCode;
use grocery_integration_tests::TestApp;

async fn user_count(app: &TestApp) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(app.pool())
        .await
        .expect("count users")
}

#[tokio::test]
async fn test_signup_redirects_to_login_with_flash() {
    let mut app = TestApp::spawn().await;

    let response = app.signup("alice", "correct horse").await;
    assert!(response.is_redirect_to("/login"), "{response:?}");

    let page = app.get("/login").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Account created. Please log in."));

    // Shown once only
    let page = app.get("/login").await;
    assert!(!page.body.contains("Account created."));
}

#[tokio::test]
async fn test_signup_stores_hashed_password() {
    let mut app = TestApp::spawn().await;
    app.signup("alice", "correct horse").await;

    let hash: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?")
        .bind("alice")
        .fetch_one(app.pool())
        .await
        .expect("load hash");
    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains("correct horse"));
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let mut app = TestApp::spawn().await;
    app.signup("alice", "correct horse").await;

    let response = app.signup("alice", "another password").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Username is already taken"));
    assert_eq!(user_count(&app).await, 1);
}

#[tokio::test]
async fn test_signup_validation_errors_rerender() {
    let mut app = TestApp::spawn().await;

    let response = app.signup("al", "short").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Username must be between 3 and 50 characters"));
    assert!(response.body.contains("Password must be between 8 and 128 characters"));
    assert!(response.body.contains("value=\"al\""));
    assert_eq!(user_count(&app).await, 0);
}

#[tokio::test]
async fn test_login_with_correct_password() {
    let mut app = TestApp::spawn().await;
    app.signup("alice", "correct horse").await;

    let response = app.login("alice", "correct horse").await;
    assert!(response.is_redirect_to("/"), "{response:?}");

    let home = app.get("/").await;
    assert!(home.body.contains("Logged in as alice"));
    assert!(home.body.contains("Welcome back, alice."));
}

#[tokio::test]
async fn test_login_with_wrong_password_rejected() {
    let mut app = TestApp::spawn().await;
    app.signup("alice", "correct horse").await;

    let response = app.login("alice", "wrong horse!").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("invalid username or password"));

    // Still anonymous
    let response = app.get("/new_store").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_unknown_user_gets_same_error() {
    let mut app = TestApp::spawn().await;

    let response = app.login("nobody", "whatever123").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("invalid username or password"));
}

#[tokio::test]
async fn test_guarded_route_redirects_and_returns_after_login() {
    let mut app = TestApp::spawn().await;
    app.signup("alice", "correct horse").await;

    let response = app.get("/new_store").await;
    assert!(
        response.is_redirect_to("/login?next=%2Fnew_store"),
        "{response:?}"
    );

    let page = app.get("/login?next=%2Fnew_store").await;
    assert!(page.body.contains("action=\"/login?next=%2Fnew_store\""));

    let response = app
        .post_form(
            "/login?next=%2Fnew_store",
            &[("username", "alice"), ("password", "correct horse")],
        )
        .await;
    assert!(response.is_redirect_to("/new_store"), "{response:?}");

    let page = app.get("/new_store").await;
    assert_eq!(page.status, StatusCode::OK);
}

#[tokio::test]
async fn test_guarded_post_redirects_to_plain_login() {
    let mut app = TestApp::spawn().await;

    let response = app
        .post_form("/new_store", &[("title", "Joe's"), ("address", "1 Main St")])
        .await;
    assert!(response.is_redirect_to("/login"), "{response:?}");

    let stores: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grocery_stores")
        .fetch_one(app.pool())
        .await
        .expect("count stores");
    assert_eq!(stores, 0);
}

#[tokio::test]
async fn test_offsite_next_is_ignored() {
    let mut app = TestApp::spawn().await;
    app.signup("alice", "correct horse").await;

    for next in ["https%3A%2F%2Fevil.example", "%2F%2Fevil.example"] {
        app.clear_cookies();
        let response = app
            .post_form(
                &format!("/login?next={next}"),
                &[("username", "alice"), ("password", "correct horse")],
            )
            .await;
        assert!(response.is_redirect_to("/"), "{next}: {response:?}");
    }
}

#[tokio::test]
async fn test_logout_ends_session() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;

    let response = app.get("/logout").await;
    assert!(response.is_redirect_to("/"), "{response:?}");

    let home = app.get("/").await;
    assert!(!home.body.contains("Logged in as"));
    assert!(home.body.contains("href=\"/login\""));

    let response = app.get("/new_item").await;
    assert!(response.is_redirect_to("/login?next=%2Fnew_item"));
}
