//! User domain entity and registration draft.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validation::{
    blank_as_none, email_format, minimum_age, parse_birthday, FieldErrors,
    INVALID_BIRTHDAY,
};

/// User domain entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub birthday: NaiveDate,
    /// Secrets this user posted, oldest first
    pub secrets: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name, "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check whether this user posted the given secret
    pub fn owns(&self, secret_id: &Uuid) -> bool {
        self.secrets.contains(secret_id)
    }
}

/// Registration form as submitted.
///
/// Every field is optional at this stage so that a missing value is
/// reported as "required" instead of failing deserialization.
#[derive(Clone, Default, Deserialize, Validate)]
pub struct NewUser {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please type in your first name"),
        length(min = 2, message = "First name must be at least 2 characters long")
    )]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please type in your last name"),
        length(min = 2, message = "Last name must be at least 2 characters long")
    )]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please type in your email"),
        custom(function = "email_format")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please type in your password"),
        length(min = 5, message = "Password must be at least 5 characters long")
    )]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please enter your birthday"),
        custom(function = "minimum_age")
    )]
    pub birthday: Option<String>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("birthday", &self.birthday)
            .finish()
    }
}

/// Registration fields in form order
pub const USER_FIELDS: &[&str] = &["first_name", "last_name", "email", "password", "birthday"];

/// Registration data that passed every field constraint.
#[derive(Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub birthday: NaiveDate,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("birthday", &self.birthday)
            .finish()
    }
}

impl NewUser {
    /// Run all field constraints and return the typed registration.
    pub fn into_registration(self) -> Result<Registration, FieldErrors> {
        if let Err(errors) = self.validate() {
            return Err(FieldErrors::from_validation(&errors, USER_FIELDS));
        }

        match (
            self.first_name,
            self.last_name,
            self.email,
            self.password,
            self.birthday,
        ) {
            (Some(first_name), Some(last_name), Some(email), Some(password), Some(birthday)) => {
                let birthday = parse_birthday(&birthday)
                    .ok_or_else(|| FieldErrors::single("birthday", INVALID_BIRTHDAY))?;
                Ok(Registration {
                    first_name,
                    last_name,
                    email,
                    password,
                    birthday,
                })
            }
            _ => Err(FieldErrors::single("form", "Registration form is incomplete")),
        }
    }
}

/// Persistable user record (password already hashed).
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub birthday: NaiveDate,
}
