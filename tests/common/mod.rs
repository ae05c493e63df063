//! Shared helpers for integration tests: an in-memory store behind the
//! repository traits, and a router driver that carries the session cookie.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use sea_orm::{DbErr, RuntimeErr};
use tower::ServiceExt;
use uuid::Uuid;

use dojo_secrets::api::{create_router, session_layer, AppState};
use dojo_secrets::config::Config;
use dojo_secrets::domain::validation::EMAIL_TAKEN;
use dojo_secrets::domain::{Comment, FieldErrors, NewUserRecord, Secret, User};
use dojo_secrets::errors::{AppError, AppResult};
use dojo_secrets::infra::{SecretRepository, UnitOfWork, UserRepository};
use dojo_secrets::services::Services;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // Insertion order; newest last
    secrets: Vec<Secret>,
}

/// In-memory implementation of every repository
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn user(&self, email: &str) -> Option<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn secrets(&self) -> Vec<Secret> {
        self.tables.lock().unwrap().secrets.clone()
    }

    pub fn secret_with(&self, content: &str) -> Option<Secret> {
        self.secrets().into_iter().find(|s| s.content == content)
    }

    /// Drop a user and the secrets they posted
    pub fn remove_user(&self, email: &str) {
        let mut tables = self.tables.lock().unwrap();
        let owned: Vec<Uuid> = tables
            .users
            .iter()
            .filter(|u| u.email == email)
            .flat_map(|u| u.secrets.clone())
            .collect();
        tables.users.retain(|u| u.email != email);
        tables.secrets.retain(|s| !owned.contains(&s.id));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every query fails the way a dropped connection does
    fn available(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database(DbErr::Conn(RuntimeErr::Internal(
                "connection refused".to_string(),
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.available()?;
        Ok(self.user(email))
    }

    async fn create(&self, record: NewUserRecord) -> AppResult<User> {
        self.available()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == record.email) {
            return Err(AppError::Validation(FieldErrors::single("email", EMAIL_TAKEN)));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            password_hash: record.password_hash,
            birthday: record.birthday,
            secrets: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl SecretRepository for MemoryStore {
    async fn list_newest_first(&self) -> AppResult<Vec<Secret>> {
        self.available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.secrets.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Secret>> {
        self.available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.secrets.iter().find(|s| s.id == id).cloned())
    }

    async fn exists(&self, id: Uuid) -> AppResult<bool> {
        self.available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.secrets.iter().any(|s| s.id == id))
    }

    async fn create_for_user(&self, user_id: Uuid, content: String) -> AppResult<Secret> {
        self.available()?;
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let secret = Secret {
            id: Uuid::new_v4(),
            content,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let owner = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AppError::NotFound)?;
        owner.secrets.push(secret.id);
        tables.secrets.push(secret.clone());
        Ok(secret)
    }

    async fn add_comment(&self, secret_id: Uuid, content: String) -> AppResult<Comment> {
        self.available()?;
        let mut tables = self.tables.lock().unwrap();
        let secret = tables
            .secrets
            .iter_mut()
            .find(|s| s.id == secret_id)
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            secret_id,
            content,
            created_at: now,
            updated_at: now,
        };
        secret.comments.push(comment.clone());
        secret.updated_at = now;
        Ok(comment)
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.available()?;
        let mut tables = self.tables.lock().unwrap();
        tables.secrets.retain(|s| s.id != id);
        for user in tables.users.iter_mut() {
            user.secrets.retain(|s| *s != id);
        }
        Ok(())
    }

    async fn is_owned_by(&self, secret_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        self.available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .any(|u| u.id == user_id && u.secrets.contains(&secret_id)))
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    fn secrets(&self) -> Arc<dyn SecretRepository> {
        Arc::new(self.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        self.available()
    }
}

/// Build a router over a fresh in-memory store
pub fn test_app() -> (Router, MemoryStore) {
    let store = MemoryStore::default();
    let state = AppState::from_container(&Services::new(Arc::new(store.clone())));
    let sessions = session_layer(tower_sessions::MemoryStore::default(), &Config::default());
    let router = create_router(state, sessions);
    (router, store)
}

/// A browser: one router, one cookie jar
pub struct Client {
    router: Router,
    cookie: Option<String>,
}

impl Client {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookie: None,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Response {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    pub async fn get(&mut self, path: &str) -> Response {
        let request = self.request("GET", path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, path: &str, fields: &[(&str, &str)]) -> Response {
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
            .unwrap();
        self.send(request).await
    }

    /// GET a page and return its status and HTML
    pub async fn page(&mut self, path: &str) -> (StatusCode, String) {
        let response = self.get(path).await;
        let status = response.status();
        (status, body_text(response).await)
    }

    pub async fn register(&mut self, first: &str, email: &str, password: &str) -> Response {
        self.post(
            "/register",
            &[
                ("first_name", first),
                ("last_name", "Pony"),
                ("email", email),
                ("password", password),
                ("birthday", "1995-07-01"),
            ],
        )
        .await
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
