//! Subscriptions module - in-app purchase records and their expiry.

mod subscriptions_model;
mod subscriptions_service;
mod subscriptions_traits;


pub use subscriptions_model::{
    NewSubscription, NewSubscriptionRecord, Subscription, SubscriptionPlan,
};
pub use subscriptions_service::SubscriptionService;
pub use subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
