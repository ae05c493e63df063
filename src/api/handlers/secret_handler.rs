//! Secrets board handlers. Every route here sits behind `require_login`.

use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
    Extension, Form, Router,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::views::{HomePage, SecretCard, ShowPage};
use crate::api::{flash, AppState};
use crate::config::ROUTE_SECRETS;
use crate::domain::{NewComment, NewSecret};
use crate::errors::{AppError, AppResult};
use crate::services::parallel;

/// Shown when a user tries to delete a secret they did not post
pub const NOT_YOUR_SECRET: &str = "You can only delete your own secrets.";

/// Create secret routes
pub fn secret_routes() -> Router<AppState> {
    Router::new()
        .route(ROUTE_SECRETS, get(list_secrets))
        .route("/secrets/process", post(post_secret))
        .route("/secrets/:id", get(show_secret))
        .route("/secrets/:id/comment", post(post_comment))
        .route("/secrets/delete/:id", get(delete_secret))
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

fn secret_path(id: &str) -> String {
    format!("{ROUTE_SECRETS}/{id}")
}

/// Render every secret, newest first
pub async fn list_secrets(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> AppResult<HomePage> {
    let (user, secrets) = parallel::join2(
        state.user_service.current_user(&current.email),
        state.secret_service.list(),
    )
    .await?;

    Ok(HomePage {
        user_name: user.full_name(),
        secrets: secrets
            .iter()
            .map(|secret| SecretCard::new(secret, &user))
            .collect(),
        errors: flash::take(&session, flash::SECRET).await?,
    })
}

/// Post a secret owned by the current user
pub async fn post_secret(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<NewSecret>,
) -> AppResult<Redirect> {
    let user = state.user_service.current_user(&current.email).await?;

    match state.secret_service.post(user.id, form).await {
        Ok(_) => {}
        Err(AppError::Validation(errors)) => {
            flash::push_errors(&session, flash::SECRET, &errors).await?;
        }
        Err(e) => return Err(e),
    }

    Ok(Redirect::to(ROUTE_SECRETS))
}

/// Render one secret with its comments
pub async fn show_secret(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<ShowPage> {
    let secret = state.secret_service.get(parse_id(&id)?).await?;
    let errors = flash::take(&session, flash::COMMENT).await?;
    Ok(ShowPage::new(&secret, errors))
}

/// Comment on a secret
pub async fn post_comment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<NewComment>,
) -> AppResult<Redirect> {
    let secret_id = parse_id(&id)?;

    match state.secret_service.comment(secret_id, form).await {
        Ok(comment) => {
            tracing::debug!(%secret_id, comment_id = %comment.id, "Comment added");
        }
        Err(AppError::Validation(errors)) => {
            flash::push_errors(&session, flash::COMMENT, &errors).await?;
        }
        Err(e) => return Err(e),
    }

    Ok(Redirect::to(&secret_path(&id)))
}

/// Delete a secret the current user posted
pub async fn delete_secret(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    // A malformed id names nothing, so there is nothing to delete
    let Ok(secret_id) = parse_id(&id) else {
        return Ok(Redirect::to(ROUTE_SECRETS));
    };
    let user = state.user_service.current_user(&current.email).await?;

    match state.secret_service.delete(secret_id, user.id).await {
        Ok(()) => {}
        Err(AppError::Forbidden) => {
            flash::push(&session, flash::SECRET, [NOT_YOUR_SECRET]).await?;
        }
        Err(e) => return Err(e),
    }

    Ok(Redirect::to(ROUTE_SECRETS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("not-a-uuid"), Err(AppError::NotFound)));
    }

    #[test]
    fn test_secret_path() {
        assert_eq!(secret_path("abc"), "/secrets/abc");
    }
}
