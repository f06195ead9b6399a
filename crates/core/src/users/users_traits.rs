//! User repository and service traits.

use async_trait::async_trait;

use super::users_model::{NewUser, NewUserRecord, Page, ProfileUpdate, User, UserProfile};
use crate::errors::Result;

/// Persistence contract for user records.
///
/// Lookups that may legitimately miss return `Option`; `get_by_id` fails with
/// a not-found error instead.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: i32) -> Result<User>;

    /// Expects an already lower-cased email.
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    fn find_by_unique_code(&self, unique_code: &str) -> Result<Option<User>>;

    /// Returns the requested slice plus the total row count.
    fn list(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64)>;

    /// Active app users that still hold a pairing code.
    fn list_holding_codes(&self) -> Result<Vec<User>>;

    async fn insert(&self, record: NewUserRecord) -> Result<User>;

    async fn update_profile(&self, user_id: i32, update: ProfileUpdate) -> Result<User>;

    async fn update_password(&self, user_id: i32, password_hash: String) -> Result<()>;

    async fn update_profile_image(&self, user_id: i32, file_name: String) -> Result<()>;

    async fn update_fcm_id(&self, user_id: i32, fcm_id: String) -> Result<()>;

    /// Blanks the pairing code of every listed user. Returns affected rows.
    async fn clear_unique_codes(&self, user_ids: Vec<i32>) -> Result<usize>;
}

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    fn get_user(&self, user_id: i32) -> Result<User>;
    fn get_profile(&self, user_id: i32) -> Result<UserProfile>;
    fn get_user_by_email(&self, email: &str) -> Result<User>;
    fn get_user_by_unique_code(&self, unique_code: &str) -> Result<User>;
    async fn update_profile(&self, user_id: i32, update: ProfileUpdate) -> Result<UserProfile>;
    async fn update_password(&self, user_id: i32, password_hash: String) -> Result<()>;
    async fn update_profile_image(&self, user_id: i32, file_name: String) -> Result<()>;
    async fn update_fcm_id(&self, user_id: i32, fcm_id: String) -> Result<()>;
    fn list_users(&self, page: i64, per_page: i64) -> Result<Page<UserProfile>>;
    async fn release_unique_codes(&self, user_ids: Vec<i32>) -> Result<usize>;
    fn list_users_holding_codes(&self) -> Result<Vec<UserProfile>>;
}
