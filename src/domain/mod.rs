//! Domain layer - Core business entities and logic
//!
//! Users, secrets and comments, the drafts that carry their field
//! constraints, and the validation rules those drafts use.
//! No infrastructure dependencies beyond error types.

pub mod password;
pub mod secret;
pub mod user;
pub mod validation;

pub use password::Password;
pub use secret::{Comment, NewComment, NewSecret, Secret};
pub use user::{NewUser, NewUserRecord, Registration, User};
pub use validation::{validate_age, validate_email, FieldError, FieldErrors};
