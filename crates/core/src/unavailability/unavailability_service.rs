use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

use super::unavailability_model::{NewUnavailability, Unavailability};
use super::unavailability_traits::{UnavailabilityRepositoryTrait, UnavailabilityServiceTrait};
use crate::errors::Result;
use crate::users::UserServiceTrait;

pub struct UnavailabilityService {
    repository: Arc<dyn UnavailabilityRepositoryTrait>,
    user_service: Arc<dyn UserServiceTrait>,
}

impl UnavailabilityService {
    pub fn new(
        repository: Arc<dyn UnavailabilityRepositoryTrait>,
        user_service: Arc<dyn UserServiceTrait>,
    ) -> Self {
        Self {
            repository,
            user_service,
        }
    }
}

#[async_trait]
impl UnavailabilityServiceTrait for UnavailabilityService {
    async fn add_unavailability(
        &self,
        new_unavailability: NewUnavailability,
        now: NaiveDateTime,
    ) -> Result<Unavailability> {
        new_unavailability.validate(now)?;
        self.user_service.get_user(new_unavailability.user_id)?;
        self.repository.insert(new_unavailability).await
    }
}
