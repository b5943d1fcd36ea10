//! Store create, update and detail pages.

use axum::http::StatusCode;
use grocery_integration_tests::TestApp;

async fn user_id(app: &TestApp, username: &str) -> i64 {
    sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(app.pool())
        .await
        .expect("load user id")
}

async fn store_row(app: &TestApp, id: i64) -> (String, String, i64) {
    sqlx::query_as("SELECT title, address, created_by_id FROM grocery_stores WHERE id = ?")
        .bind(id)
        .fetch_one(app.pool())
        .await
        .expect("load store")
}

#[tokio::test]
async fn test_create_store_sets_creator() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;

    let store_id = app.create_store("Joe's", "1 Main St").await;

    let (title, address, created_by) = store_row(&app, store_id.as_i64()).await;
    assert_eq!(title, "Joe's");
    assert_eq!(address, "1 Main St");
    assert_eq!(created_by, user_id(&app, "alice").await);

    let page = app.get(&format!("/store/{store_id}")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("New store added."));
    assert!(page.body.contains("Created by alice"));
}

#[tokio::test]
async fn test_update_store_preserves_creator() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    let store_id = app.create_store("Corner Shop", "1 Main St").await;

    app.clear_cookies();
    app.signup_and_login("bob", "battery staple").await;

    let response = app
        .post_form(
            &format!("/store/{store_id}"),
            &[("title", "Corner Market"), ("address", "2 High St")],
        )
        .await;
    assert!(
        response.is_redirect_to(&format!("/store/{store_id}")),
        "{response:?}"
    );

    let (title, address, created_by) = store_row(&app, store_id.as_i64()).await;
    assert_eq!(title, "Corner Market");
    assert_eq!(address, "2 High St");
    assert_eq!(created_by, user_id(&app, "alice").await);

    let page = app.get(&format!("/store/{store_id}")).await;
    assert!(page.body.contains("Store updated."));
    assert!(page.body.contains("value=\"Corner Market\""));
}

#[tokio::test]
async fn test_invalid_store_rerenders_with_errors() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;

    let response = app
        .post_form("/new_store", &[("title", "Jo"), ("address", "1 Main St")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Title must be between 3 and 80 characters"));
    assert!(response.body.contains("value=\"1 Main St\""));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grocery_stores")
        .fetch_one(app.pool())
        .await
        .expect("count stores");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_invalid_update_leaves_store_unchanged() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    let store_id = app.create_store("Corner Shop", "1 Main St").await;

    let response = app
        .post_form(
            &format!("/store/{store_id}"),
            &[("title", ""), ("address", "2 High St")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let (title, address, _) = store_row(&app, store_id.as_i64()).await;
    assert_eq!(title, "Corner Shop");
    assert_eq!(address, "1 Main St");
}

#[tokio::test]
async fn test_unknown_store_is_not_found() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;

    assert_eq!(app.get("/store/999").await.status, StatusCode::NOT_FOUND);

    let response = app
        .post_form("/store/999", &[("title", "Ghost"), ("address", "Nowhere")])
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_page_lists_items() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    let store_id = app.create_store("Corner Shop", "1 Main St").await;
    app.create_item("Bread", "2.25", "bakery", store_id).await;
    app.create_item("Apples", "1.10", "produce", store_id).await;

    let page = app.get(&format!("/store/{store_id}")).await;
    let apples = page.body.find("Apples").expect("apples listed");
    let bread = page.body.find("Bread").expect("bread listed");
    assert!(apples < bread, "items sorted by name");
    assert!(page.body.contains("$2.25"));
}

#[tokio::test]
async fn test_home_lists_stores() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    app.create_store("Corner Shop", "1 Main St").await;

    app.get("/logout").await;
    let home = app.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("Corner Shop"));
    assert!(!home.body.contains("My Shopping List"));
}
