//! Item create, update and detail pages.

use axum::http::StatusCode;
use grocery_integration_tests::TestApp;

async fn item_row(app: &TestApp, id: i64) -> (String, String, String, Option<String>, i64, i64) {
    sqlx::query_as(
        "SELECT name, price, category, photo_url, store_id, created_by_id FROM grocery_items WHERE id = ?",
    )
    .bind(id)
    .fetch_one(app.pool())
    .await
    .expect("load item")
}

#[tokio::test]
async fn test_create_item() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    let store_id = app.create_store("Corner Shop", "1 Main St").await;

    let item_id = app.create_item("Milk", "3.50", "deli", store_id).await;

    let (name, price, category, photo_url, item_store, _) = item_row(&app, item_id.as_i64()).await;
    assert_eq!(name, "Milk");
    assert_eq!(price, "3.50");
    assert_eq!(category, "deli");
    assert_eq!(photo_url, None);
    assert_eq!(item_store, store_id.as_i64());

    let page = app.get(&format!("/item/{item_id}")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("New item added."));
    assert!(page.body.contains("$3.50"));
    assert!(page.body.contains("Corner Shop"));
    assert!(page.body.contains("Created by alice"));
    assert!(page.body.contains("Add to Shopping List"));
}

#[tokio::test]
async fn test_create_item_with_photo() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    let store_id = app.create_store("Corner Shop", "1 Main St").await.to_string();

    let response = app
        .post_form(
            "/new_item",
            &[
                ("name", "Sourdough"),
                ("price", "$4"),
                ("category", "bakery"),
                ("photo_url", "https://img.example/bread.jpg"),
                ("store_id", &store_id),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER, "{response:?}");

    let page = app
        .get(response.location.as_deref().expect("location"))
        .await;
    assert!(page.body.contains("src=\"https://img.example/bread.jpg\""));
    assert!(page.body.contains("$4.00"));
}

#[tokio::test]
async fn test_item_with_unknown_store_is_field_error() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    app.create_store("Corner Shop", "1 Main St").await;

    let response = app
        .post_form(
            "/new_item",
            &[
                ("name", "Milk"),
                ("price", "3.50"),
                ("category", "deli"),
                ("photo_url", ""),
                ("store_id", "999"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Choose an existing store"));
    assert!(response.body.contains("value=\"Milk\""));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grocery_items")
        .fetch_one(app.pool())
        .await
        .expect("count items");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_invalid_item_fields_rerender() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    let store_id = app.create_store("Corner Shop", "1 Main St").await.to_string();

    let response = app
        .post_form(
            "/new_item",
            &[
                ("name", "Milk"),
                ("price", "-1"),
                ("category", "toys"),
                ("photo_url", "ftp://files.example/milk.png"),
                ("store_id", &store_id),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Price cannot be negative"));
    assert!(response.body.contains("Choose one of the listed categories"));
    assert!(response.body.contains("Photo URL must be an http(s) address"));
}

#[tokio::test]
async fn test_update_item_preserves_creator() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;
    let first = app.create_store("Corner Shop", "1 Main St").await;
    let second = app.create_store("Farm Stand", "5 Country Rd").await;
    let item_id = app.create_item("Milk", "3.50", "deli", first).await;
    let (.., alice_id) = item_row(&app, item_id.as_i64()).await;

    app.clear_cookies();
    app.signup_and_login("bob", "battery staple").await;

    let second_id = second.to_string();
    let response = app
        .post_form(
            &format!("/item/{item_id}"),
            &[
                ("name", "Whole Milk"),
                ("price", "3.75"),
                ("category", "deli"),
                ("photo_url", ""),
                ("store_id", &second_id),
            ],
        )
        .await;
    assert!(
        response.is_redirect_to(&format!("/item/{item_id}")),
        "{response:?}"
    );

    let (name, price, _, _, store_id, created_by) = item_row(&app, item_id.as_i64()).await;
    assert_eq!(name, "Whole Milk");
    assert_eq!(price, "3.75");
    assert_eq!(store_id, second.as_i64());
    assert_eq!(created_by, alice_id);

    let page = app.get(&format!("/item/{item_id}")).await;
    assert!(page.body.contains("Item updated."));
    assert!(page.body.contains("Created by alice"));
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;

    assert_eq!(app.get("/item/42").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_item_page_offers_stores() {
    let mut app = TestApp::spawn().await;
    app.signup_and_login("alice", "correct horse").await;

    let page = app.get("/new_item").await;
    assert!(page.body.contains("Add a store"));

    let store_id = app.create_store("Corner Shop", "1 Main St").await;
    let page = app.get("/new_item").await;
    assert!(page.body.contains(&format!("<option value=\"{store_id}\">Corner Shop</option>")));
}
