//! Database models for subscriptions.

use diesel::prelude::*;

use pairgoal_core::errors::Error;
use pairgoal_core::subscriptions::{NewSubscriptionRecord, Subscription};
use pairgoal_core::utils::time_utils::format_timestamp;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionDB {
    pub id: i32,
    pub user_id: i32,
    pub partner_mapping_id: Option<i32>,
    pub purchase_plan_id: String,
    pub amount: f64,
    pub device_name: String,
    pub plan: String,
    pub receipt: String,
    pub status: i32,
    pub expiry_date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscriptionDB {
    pub user_id: i32,
    pub partner_mapping_id: Option<i32>,
    pub purchase_plan_id: String,
    pub amount: f64,
    pub device_name: String,
    pub plan: String,
    pub receipt: String,
    pub status: i32,
    pub expiry_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NewSubscriptionDB {
    pub fn from_record(record: NewSubscriptionRecord, status: i32, now: String) -> Self {
        let subscription = record.subscription;
        Self {
            user_id: subscription.user_id,
            partner_mapping_id: subscription.partner_mapping_id,
            purchase_plan_id: subscription.purchase_plan_id,
            amount: subscription.amount,
            device_name: subscription.device_name,
            plan: subscription.plan.to_string(),
            receipt: subscription.receipt,
            status,
            expiry_date: format_timestamp(record.expiry_date),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TryFrom<SubscriptionDB> for Subscription {
    type Error = Error;

    fn try_from(db: SubscriptionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            partner_mapping_id: db.partner_mapping_id,
            purchase_plan_id: db.purchase_plan_id,
            amount: db.amount,
            device_name: db.device_name,
            plan: db.plan.parse()?,
            receipt: db.receipt,
            status: db.status,
            expiry_date: db.expiry_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
