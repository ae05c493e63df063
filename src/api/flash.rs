//! One-shot flash messages kept in the session.
//!
//! Messages are grouped by category and removed when read.

use std::collections::HashMap;

use tower_sessions::Session;

use crate::config::SESSION_KEY_FLASH;
use crate::domain::FieldErrors;
use crate::errors::AppResult;

pub const REGISTER: &str = "register";
pub const LOGIN: &str = "login";
pub const SECRET: &str = "secret";
pub const COMMENT: &str = "comment";

type Flashes = HashMap<String, Vec<String>>;

async fn load(session: &Session) -> AppResult<Flashes> {
    Ok(session
        .get::<Flashes>(SESSION_KEY_FLASH)
        .await?
        .unwrap_or_default())
}

/// Queue messages under a category.
pub async fn push<I, S>(session: &Session, category: &str, messages: I) -> AppResult<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut flashes = load(session).await?;
    flashes
        .entry(category.to_string())
        .or_default()
        .extend(messages.into_iter().map(Into::into));
    session.insert(SESSION_KEY_FLASH, flashes).await?;
    Ok(())
}

/// Queue every field error under a category, in field order.
pub async fn push_errors(session: &Session, category: &str, errors: &FieldErrors) -> AppResult<()> {
    push(session, category, errors.messages()).await
}

/// Remove and return the messages of one category.
pub async fn take(session: &Session, category: &str) -> AppResult<Vec<String>> {
    let mut flashes = load(session).await?;
    let Some(messages) = flashes.remove(category) else {
        return Ok(Vec::new());
    };

    if flashes.is_empty() {
        session.remove::<Flashes>(SESSION_KEY_FLASH).await?;
    } else {
        session.insert(SESSION_KEY_FLASH, flashes).await?;
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_take_consumes_one_category() {
        let session = session();
        push(&session, LOGIN, ["Incorrect password."]).await.unwrap();
        push(&session, REGISTER, ["Please type in your email"]).await.unwrap();

        assert_eq!(take(&session, LOGIN).await.unwrap(), vec!["Incorrect password."]);
        assert!(take(&session, LOGIN).await.unwrap().is_empty());
        assert_eq!(
            take(&session, REGISTER).await.unwrap(),
            vec!["Please type in your email"]
        );
    }

    #[tokio::test]
    async fn test_push_errors_keeps_field_order() {
        let session = session();
        let mut errors = FieldErrors::new();
        errors.push("first_name", "Please type in your first name");
        errors.push("email", "Please type in your email");
        push_errors(&session, REGISTER, &errors).await.unwrap();

        assert_eq!(
            take(&session, REGISTER).await.unwrap(),
            vec!["Please type in your first name", "Please type in your email"]
        );
    }
}
