use async_trait::async_trait;

use super::partners_model::{NewPartnerMapping, PartnerMapping};
use crate::errors::Result;
use crate::users::UserProfile;

/// Trait for partner mapping repository operations
#[async_trait]
pub trait PartnerRepositoryTrait: Send + Sync {
    fn get_by_id(&self, mapping_id: i32) -> Result<PartnerMapping>;

    /// Active mappings where the user sits on either side.
    fn list_active_for_user(&self, user_id: i32) -> Result<Vec<PartnerMapping>>;

    /// Inserts an active mapping unless either user already has one.
    ///
    /// The check and the insert run in the same write transaction; a clash
    /// fails with `Error::ConstraintViolation`.
    async fn insert_exclusive(&self, new_mapping: NewPartnerMapping) -> Result<PartnerMapping>;
}

/// Trait for partner pairing service operations
#[async_trait]
pub trait PartnerServiceTrait: Send + Sync {
    fn resolve_partner_mapping(&self, user_id: i32) -> Result<PartnerMapping>;
    fn resolve_partner_user_id(&self, user_id: i32, mapping: &PartnerMapping) -> Result<i32>;
    async fn create_mapping(&self, user_a: i32, user_b: i32) -> Result<PartnerMapping>;
    fn get_partner(&self, user_id: i32) -> Result<UserProfile>;
    async fn link_by_code(&self, user_id: i32, unique_code: &str) -> Result<PartnerMapping>;
}
