//! User domain models.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::errors::{invalid_input, Result, ValidationError};
use crate::Error;

const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$";

/// Full user record as stored. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub role_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub unique_code: String,
    pub profile_image: Option<String>,
    pub fcm_id: Option<String>,
    pub face_id: bool,
    pub touch_id: bool,
    pub notification_mute_status: bool,
    pub notification_mute_end: Option<String>,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Public attributes of a user, safe to embed in goal listings and partner lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i32,
    pub role_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub face_id: bool,
    pub touch_id: bool,
    pub notification_mute_status: bool,
    pub notification_mute_end: Option<String>,
    pub status: i32,
    pub updated_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role_id: user.role_id,
            first_name: user.first_name,
            last_name: user.last_name,
            gender: user.gender,
            email: user.email,
            profile_image: user.profile_image,
            face_id: user.face_id,
            touch_id: user.touch_id,
            notification_mute_status: user.notification_mute_status,
            notification_mute_end: user.notification_mute_end,
            status: user.status,
            updated_at: user.updated_at,
        }
    }
}

/// Registration input. The password arrives already hashed by the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        validate_name("First name", &self.first_name)?;
        validate_name("Last name", &self.last_name)?;
        validate_name("Gender", &self.gender)?;
        validate_email(&self.email)?;
        if self.password_hash.is_empty() {
            return Err(ValidationError::MissingField("Password".to_string()).into());
        }
        Ok(())
    }
}

/// Row handed to the repository once the service has filled in the derived fields.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub role_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub password: String,
    pub unique_code: String,
    pub status: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_name("First name", &self.first_name)?;
        validate_name("Last name", &self.last_name)
    }
}

/// One page of a listing together with the unpaged total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            items,
            total,
            page,
            per_page,
            pages,
        }
    }
}

/// Names (and gender) must be non-empty ASCII letters only.
pub fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    if !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid_input(format!(
            "Please enter a valid {}",
            field.to_lowercase()
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    if email.trim().is_empty() {
        return Err(ValidationError::MissingField("Email".to_string()).into());
    }
    let re = EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));
    if re.is_match(email.trim()) {
        Ok(())
    } else {
        Err(invalid_input("Please enter a valid email"))
    }
}

/// Emails are compared and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Convenience for services that need to reject a missing user uniformly.
pub fn user_not_found(id: i32) -> Error {
    Error::NotFound(format!("No user found with id {}", id))
}
