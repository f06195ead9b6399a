use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::unavailability_model::{NewUnavailability, Unavailability};
use crate::errors::Result;

#[async_trait]
pub trait UnavailabilityRepositoryTrait: Send + Sync {
    async fn insert(&self, new_unavailability: NewUnavailability) -> Result<Unavailability>;
}

#[async_trait]
pub trait UnavailabilityServiceTrait: Send + Sync {
    async fn add_unavailability(
        &self,
        new_unavailability: NewUnavailability,
        now: NaiveDateTime,
    ) -> Result<Unavailability>;
}
