//! End-to-end test support for the grocery list site.
//!
//! [`TestApp`] drives the real router in-process with
//! `tower::ServiceExt::oneshot`, backed by a throwaway `SQLite` file and a
//! one-cookie jar that follows the session cookie like a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p grocery-integration-tests
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use sqlx::SqlitePool;
use tower::ServiceExt;

use grocery_core::{ItemId, StoreId};
use grocery_web::config::WebConfig;
use grocery_web::db;
use grocery_web::middleware::session::SESSION_COOKIE_NAME;
use grocery_web::state::AppState;

static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A response with its body read into memory.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// `Location` header, for redirects.
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Whether this is a 303 redirect to `path`.
    #[must_use]
    pub fn is_redirect_to(&self, path: &str) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some(path)
    }
}

/// In-process application with its own database and cookie jar.
pub struct TestApp {
    router: Router,
    pool: SqlitePool,
    session_cookie: Option<String>,
    db_path: PathBuf,
}

impl TestApp {
    /// Build the application on a fresh database file.
    ///
    /// # Panics
    ///
    /// Panics if the database or session store cannot be set up.
    pub async fn spawn() -> Self {
        let db_path = unique_db_path();
        let url = format!("sqlite://{}", db_path.display());
        let config = WebConfig::for_database(&url);

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("Failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("Failed to migrate test database");

        let state = AppState::new(config, pool.clone());
        let router = grocery_web::build_app(state)
            .await
            .expect("Failed to build app");

        Self {
            router,
            pool,
            session_cookie: None,
            db_path,
        }
    }

    /// Direct access to the database, for assertions.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Forget the session cookie, as a fresh browser would.
    pub fn clear_cookies(&mut self) {
        self.session_cookie = None;
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// Send a POST with an `application/x-www-form-urlencoded` body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE_NAME}={cookie}"));
        }
        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        for value in response.headers().get_all(header::SET_COOKIE) {
            if let Ok(value) = value.to_str() {
                self.store_cookie(value);
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn store_cookie(&mut self, set_cookie: &str) {
        let Some(pair) = set_cookie.split(';').next() else {
            return;
        };
        let Some((name, value)) = pair.trim().split_once('=') else {
            return;
        };
        if name != SESSION_COOKIE_NAME {
            return;
        }

        let expired = set_cookie
            .split(';')
            .any(|attr| attr.trim().eq_ignore_ascii_case("max-age=0"));
        if value.is_empty() || expired {
            self.session_cookie = None;
        } else {
            self.session_cookie = Some(value.to_string());
        }
    }

    // =========================================================================
    // Flows
    // =========================================================================

    /// Submit the sign up form.
    pub async fn signup(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/signup", &[("username", username), ("password", password)])
            .await
    }

    /// Submit the login form.
    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    /// Sign up and log in, asserting both succeed.
    ///
    /// # Panics
    ///
    /// Panics if either step does not redirect as expected.
    pub async fn signup_and_login(&mut self, username: &str, password: &str) {
        let response = self.signup(username, password).await;
        assert!(response.is_redirect_to("/login"), "signup failed: {response:?}");
        let response = self.login(username, password).await;
        assert!(response.is_redirect_to("/"), "login failed: {response:?}");
    }

    /// Create a store and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if the store is not created.
    pub async fn create_store(&mut self, title: &str, address: &str) -> StoreId {
        let response = self
            .post_form("/new_store", &[("title", title), ("address", address)])
            .await;
        StoreId::new(id_from_location(&response, "/store/"))
    }

    /// Create an item and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if the item is not created.
    pub async fn create_item(
        &mut self,
        name: &str,
        price: &str,
        category: &str,
        store_id: StoreId,
    ) -> ItemId {
        let store_id = store_id.to_string();
        let response = self
            .post_form(
                "/new_item",
                &[
                    ("name", name),
                    ("price", price),
                    ("category", category),
                    ("photo_url", ""),
                    ("store_id", &store_id),
                ],
            )
            .await;
        ItemId::new(id_from_location(&response, "/item/"))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut path = self.db_path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

fn id_from_location(response: &TestResponse, prefix: &str) -> i64 {
    assert_eq!(
        response.status,
        StatusCode::SEE_OTHER,
        "expected redirect: {response:?}"
    );
    response
        .location
        .as_deref()
        .and_then(|l| l.strip_prefix(prefix))
        .and_then(|id| id.parse().ok())
        .unwrap_or_else(|| panic!("unexpected location: {:?}", response.location))
}

fn unique_db_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let n = DB_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "grocery-test-{}-{nanos}-{n}.db",
        std::process::id()
    ))
}
