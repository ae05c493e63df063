//! Landing page, registration, login and logout.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::api::views::StartPage;
use crate::api::{flash, session, AppState};
use crate::config::{ROUTE_LANDING, ROUTE_SECRETS};
use crate::domain::NewUser;
use crate::errors::{AppError, AppResult};

/// Login form as submitted
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Create landing and authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(ROUTE_LANDING, get(landing))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

/// Render the registration and login forms
pub async fn landing(session: Session) -> AppResult<StartPage> {
    Ok(StartPage {
        register_errors: flash::take(&session, flash::REGISTER).await?,
        login_errors: flash::take(&session, flash::LOGIN).await?,
    })
}

/// Register a new user and sign them in
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewUser>,
) -> AppResult<Response> {
    match state.auth_service.register(form).await {
        Ok(user) => {
            session::start(&session, &user.email).await?;
            Ok(Redirect::to(ROUTE_SECRETS).into_response())
        }
        Err(AppError::Validation(errors)) => {
            tracing::debug!(errors = %errors, "Registration rejected");
            flash::push_errors(&session, flash::REGISTER, &errors).await?;
            Ok(Redirect::to(ROUTE_LANDING).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Check credentials and sign the user in
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match state.auth_service.login(form.email.trim(), &form.password).await {
        Ok(user) => {
            session::start(&session, &user.email).await?;
            tracing::info!(user_id = %user.id, "User logged in");
            Ok(Redirect::to(ROUTE_SECRETS).into_response())
        }
        Err(AppError::InvalidCredentials(message)) => {
            flash::push(&session, flash::LOGIN, [message]).await?;
            Ok(Redirect::to(ROUTE_LANDING).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Destroy the session
pub async fn logout(session: Session) -> AppResult<Redirect> {
    session::end(&session).await?;
    Ok(Redirect::to(ROUTE_LANDING))
}
