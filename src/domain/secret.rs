//! Secret and Comment entities, plus their submission drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validation::{blank_as_none, FieldErrors};

/// A comment attached to a secret
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub secret_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Secret with its comments, oldest comment first
#[derive(Debug, Clone, Serialize)]
pub struct Secret {
    pub id: Uuid,
    pub content: String,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Secret {
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// Secret form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewSecret {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please type in a secret"),
        length(min = 5, message = "Secrets must be at least 5 characters long")
    )]
    pub secret: Option<String>,
}

impl NewSecret {
    pub fn into_content(self) -> Result<String, FieldErrors> {
        self.validate()
            .map_err(|e| FieldErrors::from_validation(&e, &["secret"]))?;
        self.secret
            .ok_or_else(|| FieldErrors::single("secret", "Please type in a secret"))
    }
}

/// Comment form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewComment {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please type in a comment"),
        length(min = 5, message = "Comments must be at least 5 characters long")
    )]
    pub comment: Option<String>,
}

impl NewComment {
    pub fn into_content(self) -> Result<String, FieldErrors> {
        self.validate()
            .map_err(|e| FieldErrors::from_validation(&e, &["comment"]))?;
        self.comment
            .ok_or_else(|| FieldErrors::single("comment", "Please type in a comment"))
    }
}
