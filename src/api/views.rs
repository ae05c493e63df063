//! Server-rendered pages.
//!
//! Templates live under `templates/` and are compiled in by askama.
//! View structs carry display-ready strings so templates stay logic-free.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, Secret, User};

const TIMESTAMP_FORMAT: &str = "%B %-d, %Y %-I:%M %p";

fn posted_at(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Landing page with the registration and login forms
#[derive(Template)]
#[template(path = "start.html")]
pub struct StartPage {
    pub register_errors: Vec<String>,
    pub login_errors: Vec<String>,
}

/// One entry on the secrets board
pub struct SecretCard {
    pub id: String,
    pub content: String,
    pub comment_count: usize,
    pub posted: String,
    pub mine: bool,
}

impl SecretCard {
    pub fn new(secret: &Secret, viewer: &User) -> Self {
        Self {
            id: secret.id.to_string(),
            content: secret.content.clone(),
            comment_count: secret.comment_count(),
            posted: posted_at(&secret.created_at),
            mine: viewer.owns(&secret.id),
        }
    }
}

/// The secrets board
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub user_name: String,
    pub secrets: Vec<SecretCard>,
    pub errors: Vec<String>,
}

pub struct CommentLine {
    pub content: String,
    pub posted: String,
}

impl From<&Comment> for CommentLine {
    fn from(comment: &Comment) -> Self {
        Self {
            content: comment.content.clone(),
            posted: posted_at(&comment.created_at),
        }
    }
}

/// A single secret with its comments
#[derive(Template)]
#[template(path = "show.html")]
pub struct ShowPage {
    pub id: String,
    pub content: String,
    pub posted: String,
    pub comments: Vec<CommentLine>,
    pub errors: Vec<String>,
}

impl ShowPage {
    pub fn new(secret: &Secret, errors: Vec<String>) -> Self {
        Self {
            id: secret.id.to_string(),
            content: secret.content.clone(),
            posted: posted_at(&secret.created_at),
            comments: secret.comments.iter().map(CommentLine::from).collect(),
            errors,
        }
    }
}

/// Error page for 4xx/5xx responses
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub reason: String,
    pub message: String,
}
