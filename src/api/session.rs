//! Session-backed authentication state.
//!
//! The session record holds `{ login, email }` under a single key; the
//! user row is looked up again on every request that needs it.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::config::SESSION_KEY_AUTH;
use crate::errors::AppResult;

/// Identity stored in the session after register or login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub login: bool,
    pub email: String,
}

/// Mark the session as signed in, issuing a fresh session id.
pub async fn start(session: &Session, email: &str) -> AppResult<()> {
    session.cycle_id().await?;
    session
        .insert(
            SESSION_KEY_AUTH,
            AuthSession {
                login: true,
                email: email.to_string(),
            },
        )
        .await?;
    Ok(())
}

/// Signed-in identity, if any
pub async fn current(session: &Session) -> AppResult<Option<AuthSession>> {
    let auth: Option<AuthSession> = session.get(SESSION_KEY_AUTH).await?;
    Ok(auth.filter(|auth| auth.login))
}

/// Destroy the session and its cookie.
pub async fn end(session: &Session) -> AppResult<()> {
    session.flush().await?;
    Ok(())
}
