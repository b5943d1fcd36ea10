//! Authentication route handlers.
//!
//! Handles sign up, login and logout with username and password.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::flash::{self, FlashLevel};
use crate::forms::{FormErrors, LoginForm, SignupForm};
use crate::middleware::auth::{login_url, safe_next};
use crate::middleware::{OptionalAuth, set_current_user};
use crate::models::CurrentUser;
use crate::routes::PageContext;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Error shown for any failed login, whichever part was wrong.
pub const INVALID_LOGIN: &str = "invalid username or password";

/// Query parameters accepted by the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    /// Where to go after logging in.
    pub next: Option<String>,
}

impl NextQuery {
    fn safe(&self) -> Option<&str> {
        safe_next(self.next.as_deref())
    }
}

/// Sign up page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub page: PageContext,
    pub form: SignupForm,
    pub errors: FormErrors,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    /// Form target, carrying `next` through the POST.
    pub action: String,
    pub form: LoginForm,
    pub errors: FormErrors,
}

// =============================================================================
// Sign Up Routes
// =============================================================================

/// Display the sign up page.
#[instrument(skip_all)]
pub async fn signup_page(OptionalAuth(user): OptionalAuth, session: Session) -> SignupTemplate {
    SignupTemplate {
        page: PageContext::load(&session, user).await,
        form: SignupForm::default(),
        errors: FormErrors::new(),
    }
}

/// Handle sign up form submission.
///
/// On success the user is sent to the login page.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    if let Err(errors) = form.check() {
        return rejected_signup(&session, user, form, errors).await;
    }

    let auth = AuthService::new(state.pool());
    let result = auth
        .register_with_password(&form.username, &form.password)
        .await;

    let mut errors = FormErrors::new();
    match result {
        Ok(_) => {
            flash::push(
                &session,
                FlashLevel::Success,
                "Account created. Please log in.",
            )
            .await?;
            return Ok(Redirect::to("/login").into_response());
        }
        Err(AuthError::UsernameTaken) => errors.add("username", "Username is already taken"),
        Err(AuthError::InvalidUsername(e)) => errors.add("username", e.to_string()),
        Err(AuthError::WeakPassword(msg)) => errors.add("password", msg),
        Err(e) => return Err(e.into()),
    }

    rejected_signup(&session, user, form, errors).await
}

async fn rejected_signup(
    session: &Session,
    user: Option<CurrentUser>,
    mut form: SignupForm,
    errors: FormErrors,
) -> Result<Response> {
    // Never echo the password back into the page
    form.password.clear();

    let page = SignupTemplate {
        page: PageContext::load(session, user).await,
        form,
        errors,
    };
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Query(query): Query<NextQuery>,
) -> LoginTemplate {
    LoginTemplate {
        page: PageContext::load(&session, user).await,
        action: login_url(query.safe()),
        form: LoginForm::default(),
        errors: FormErrors::new(),
    }
}

/// Handle login form submission.
///
/// Verifies the password, starts a fresh session and redirects to `next`
/// when it is a local path, otherwise to the home page.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
    session: Session,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if let Err(errors) = form.check() {
        return rejected_login(&session, current, &query, form, errors).await;
    }

    let auth = AuthService::new(state.pool());
    let user = match auth
        .login_with_password(form.username.trim(), &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username.trim(), "Login failed");
            let mut errors = FormErrors::new();
            errors.add_general(INVALID_LOGIN);
            return rejected_login(&session, current, &query, form, errors).await;
        }
        Err(e) => return Err(e.into()),
    };

    // New session ID on privilege change
    session.cycle_id().await?;
    set_current_user(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, user.username.as_str());

    tracing::info!(user_id = %user.id, "user logged in");

    flash::push(
        &session,
        FlashLevel::Success,
        format!("Welcome back, {}.", user.username),
    )
    .await?;

    Ok(Redirect::to(query.safe().unwrap_or("/")).into_response())
}

async fn rejected_login(
    session: &Session,
    user: Option<CurrentUser>,
    query: &NextQuery,
    mut form: LoginForm,
    errors: FormErrors,
) -> Result<Response> {
    form.password.clear();

    let page = LoginTemplate {
        page: PageContext::load(session, user).await,
        action: login_url(query.safe()),
        form,
        errors,
    };
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

// =============================================================================
// Logout Route
// =============================================================================

/// Log out by discarding the whole session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}
