//! Login-required middleware.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::api::session;
use crate::errors::AppError;

/// Identity of the signed-in user, taken from the session
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub email: String,
}

/// Session authentication middleware.
///
/// Anonymous requests are redirected to the landing page; otherwise
/// the CurrentUser is injected into the request extensions.
pub async fn require_login(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = session::current(&session)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request
        .extensions_mut()
        .insert(CurrentUser { email: auth.email });

    Ok(next.run(request).await)
}
