use async_trait::async_trait;
use log::{debug, info};
use rand::Rng;
use std::sync::Arc;

use super::users_model::{
    normalize_email, NewUser, NewUserRecord, Page, ProfileUpdate, User, UserProfile,
};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::constants::{
    ROLE_APP_USER, STATUS_ACTIVE, UNIQUE_CODE_LENGTH, UNIQUE_CODE_MAX_ATTEMPTS,
};
use crate::errors::{invalid_input, Error, Result, ValidationError};

/// Draws a pairing code of uppercase ASCII letters.
pub fn random_unique_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..UNIQUE_CODE_LENGTH)
        .map(|_| char::from(rng.gen_range(b'A'..=b'Z')))
        .collect()
}

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Finds a pairing code no other user currently holds.
    fn generate_unique_code(&self) -> Result<String> {
        for _ in 0..UNIQUE_CODE_MAX_ATTEMPTS {
            let code = random_unique_code(&mut rand::thread_rng());
            if self.repository.find_by_unique_code(&code)?.is_none() {
                return Ok(code);
            }
            debug!("Pairing code {} already taken, drawing again", code);
        }
        Err(Error::Unexpected(
            "Unable to allocate a free pairing code".to_string(),
        ))
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let email = normalize_email(&new_user.email);

        if self.repository.find_by_email(&email)?.is_some() {
            return Err(Error::ConstraintViolation(format!(
                "Email-Id already exists: {}",
                email
            )));
        }

        let unique_code = self.generate_unique_code()?;
        let record = NewUserRecord {
            role_id: ROLE_APP_USER,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            gender: new_user.gender,
            email,
            password: new_user.password_hash,
            unique_code,
            status: STATUS_ACTIVE,
        };

        let user = self.repository.insert(record).await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    fn get_user(&self, user_id: i32) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn get_profile(&self, user_id: i32) -> Result<UserProfile> {
        self.repository.get_by_id(user_id).map(UserProfile::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.repository
            .find_by_email(&normalize_email(email))?
            .ok_or_else(|| Error::NotFound("No user found".to_string()))
    }

    fn get_user_by_unique_code(&self, unique_code: &str) -> Result<User> {
        let code = unique_code.trim().to_uppercase();
        if code.is_empty() {
            return Err(ValidationError::MissingField("Unique code".to_string()).into());
        }
        self.repository
            .find_by_unique_code(&code)?
            .ok_or_else(|| Error::NotFound(format!("No user holds code {}", code)))
    }

    async fn update_profile(&self, user_id: i32, update: ProfileUpdate) -> Result<UserProfile> {
        update.validate()?;
        let user = self.repository.update_profile(user_id, update).await?;
        Ok(UserProfile::from(user))
    }

    async fn update_password(&self, user_id: i32, password_hash: String) -> Result<()> {
        if password_hash.is_empty() {
            return Err(ValidationError::MissingField("New password".to_string()).into());
        }
        self.repository.get_by_id(user_id)?;
        self.repository.update_password(user_id, password_hash).await
    }

    async fn update_profile_image(&self, user_id: i32, file_name: String) -> Result<()> {
        if file_name.trim().is_empty() {
            return Err(invalid_input("Profile image file name is empty"));
        }
        self.repository.get_by_id(user_id)?;
        self.repository.update_profile_image(user_id, file_name).await
    }

    async fn update_fcm_id(&self, user_id: i32, fcm_id: String) -> Result<()> {
        if fcm_id.trim().is_empty() {
            return Err(ValidationError::MissingField("Fcm id".to_string()).into());
        }
        self.repository.get_by_id(user_id)?;
        self.repository.update_fcm_id(user_id, fcm_id).await
    }

    fn list_users(&self, page: i64, per_page: i64) -> Result<Page<UserProfile>> {
        if page < 1 || per_page < 1 {
            return Err(invalid_input("Page and page size must be positive"));
        }
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| invalid_input("Page is out of range"))?;
        let (users, total) = self.repository.list(offset, per_page)?;
        Ok(Page::new(
            users.into_iter().map(UserProfile::from).collect(),
            total,
            page,
            per_page,
        ))
    }

    async fn release_unique_codes(&self, user_ids: Vec<i32>) -> Result<usize> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        self.repository.clear_unique_codes(user_ids).await
    }

    fn list_users_holding_codes(&self) -> Result<Vec<UserProfile>> {
        Ok(self
            .repository
            .list_holding_codes()?
            .into_iter()
            .map(UserProfile::from)
            .collect())
    }
}
