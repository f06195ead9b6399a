use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::subscriptions_model::{NewSubscription, NewSubscriptionRecord, Subscription};
use super::subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
use crate::errors::{Error, Result};

pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepositoryTrait>,
}

impl SubscriptionService {
    pub fn new(repository: Arc<dyn SubscriptionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SubscriptionServiceTrait for SubscriptionService {
    async fn save_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription> {
        new_subscription.validate()?;
        let expiry_date = new_subscription
            .plan
            .expiry_from(Utc::now().naive_utc());
        let saved = self
            .repository
            .insert(NewSubscriptionRecord {
                subscription: new_subscription,
                expiry_date,
            })
            .await?;
        info!(
            "Saved {} subscription {} for user {}",
            saved.plan, saved.id, saved.user_id
        );
        Ok(saved)
    }

    fn get_latest_subscription(&self, user_id: i32) -> Result<Subscription> {
        self.repository
            .latest_for_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("No subscription found for user {}", user_id)))
    }
}
