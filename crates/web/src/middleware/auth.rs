//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{Method, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, returns a redirect to the login page. For `GET`
/// requests the original path is passed along as `next` so the user lands
/// back where they started.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is logged in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page, optionally remembering where to return.
    RedirectToLogin { next: Option<String> },
    /// The session layer is missing from the stack.
    MissingSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next: Some(next) } => {
                Redirect::to(&login_url(Some(&next))).into_response()
            }
            Self::RedirectToLogin { next: None } => Redirect::to(LOGIN_PATH).into_response(),
            Self::MissingSession => {
                tracing::error!("Session layer missing from middleware stack");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::MissingSession)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AuthRejection::RedirectToLogin {
                // Only a GET can be replayed after login
                next: (parts.method == Method::GET).then(|| {
                    parts
                        .uri
                        .path_and_query()
                        .map_or_else(|| parts.uri.path().to_string(), ToString::to_string)
                }),
            })?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Login page URL carrying an optional return path.
#[must_use]
pub fn login_url(next: Option<&str>) -> String {
    match next {
        Some(next) => format!("{LOGIN_PATH}?next={}", urlencoding::encode(next)),
        None => LOGIN_PATH.to_string(),
    }
}

/// Accept `next` only when it is a path on this site.
///
/// Rejects absolute URLs, protocol-relative `//host` forms and anything
/// containing a backslash, which some browsers treat as `/`.
#[must_use]
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/new_store")), Some("/new_store"));
        assert_eq!(safe_next(Some("/item/3?x=1")), Some("/item/3?x=1"));
    }

    #[test]
    fn test_safe_next_rejects_offsite_targets() {
        assert_eq!(safe_next(None), None);
        assert_eq!(safe_next(Some("")), None);
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(Some("new_store")), None);
    }

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url(None), "/login");
        assert_eq!(
            login_url(Some("/item/1?a=b")),
            "/login?next=%2Fitem%2F1%3Fa%3Db"
        );
    }
}
