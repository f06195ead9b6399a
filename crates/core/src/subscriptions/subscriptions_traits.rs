use async_trait::async_trait;

use super::subscriptions_model::{NewSubscription, NewSubscriptionRecord, Subscription};
use crate::errors::Result;

#[async_trait]
pub trait SubscriptionRepositoryTrait: Send + Sync {
    async fn insert(&self, record: NewSubscriptionRecord) -> Result<Subscription>;

    /// Newest subscription of the user, if any.
    fn latest_for_user(&self, user_id: i32) -> Result<Option<Subscription>>;
}

#[async_trait]
pub trait SubscriptionServiceTrait: Send + Sync {
    async fn save_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription>;
    fn get_latest_subscription(&self, user_id: i32) -> Result<Subscription>;
}
