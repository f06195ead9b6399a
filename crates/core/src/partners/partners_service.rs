use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::partners_model::{single_active_mapping, NewPartnerMapping, PartnerMapping};
use super::partners_traits::{PartnerRepositoryTrait, PartnerServiceTrait};
use crate::errors::{invalid_input, Result};
use crate::users::{UserProfile, UserServiceTrait};

pub struct PartnerService {
    repository: Arc<dyn PartnerRepositoryTrait>,
    user_service: Arc<dyn UserServiceTrait>,
}

impl PartnerService {
    pub fn new(
        repository: Arc<dyn PartnerRepositoryTrait>,
        user_service: Arc<dyn UserServiceTrait>,
    ) -> Self {
        Self {
            repository,
            user_service,
        }
    }
}

#[async_trait]
impl PartnerServiceTrait for PartnerService {
    fn resolve_partner_mapping(&self, user_id: i32) -> Result<PartnerMapping> {
        let mappings = self.repository.list_active_for_user(user_id)?;
        single_active_mapping(user_id, mappings)
    }

    fn resolve_partner_user_id(&self, user_id: i32, mapping: &PartnerMapping) -> Result<i32> {
        mapping.other_partner(user_id).ok_or_else(|| {
            invalid_input(format!(
                "User {} is not part of partner mapping {}",
                user_id, mapping.id
            ))
        })
    }

    async fn create_mapping(&self, user_a: i32, user_b: i32) -> Result<PartnerMapping> {
        if user_a == user_b {
            return Err(invalid_input("A user cannot be paired with themselves"));
        }
        self.user_service.get_user(user_a)?;
        self.user_service.get_user(user_b)?;

        let mapping = self
            .repository
            .insert_exclusive(NewPartnerMapping {
                partner_one_id: user_a,
                partner_two_id: user_b,
            })
            .await?;
        info!(
            "Paired users {} and {} as mapping {}",
            user_a, user_b, mapping.id
        );
        Ok(mapping)
    }

    fn get_partner(&self, user_id: i32) -> Result<UserProfile> {
        let mapping = self.resolve_partner_mapping(user_id)?;
        let partner_id = self.resolve_partner_user_id(user_id, &mapping)?;
        self.user_service.get_profile(partner_id)
    }

    async fn link_by_code(&self, user_id: i32, unique_code: &str) -> Result<PartnerMapping> {
        let target = self.user_service.get_user_by_unique_code(unique_code)?;
        let mapping = self.create_mapping(user_id, target.id).await?;
        // Codes are single-use once a pairing exists.
        self.user_service
            .release_unique_codes(vec![user_id, target.id])
            .await?;
        Ok(mapping)
    }
}
