use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use pairgoal_core::constants::STATUS_ACTIVE;
use pairgoal_core::errors::Result;
use pairgoal_core::subscriptions::{
    NewSubscriptionRecord, Subscription, SubscriptionRepositoryTrait,
};
use pairgoal_core::utils::time_utils::now_timestamp;

use super::model::{NewSubscriptionDB, SubscriptionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::subscriptions;

pub struct SubscriptionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SubscriptionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SubscriptionRepository { pool, writer }
    }
}

#[async_trait]
impl SubscriptionRepositoryTrait for SubscriptionRepository {
    async fn insert(&self, record: NewSubscriptionRecord) -> Result<Subscription> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Subscription> {
                let row = NewSubscriptionDB::from_record(record, STATUS_ACTIVE, now_timestamp());
                let saved = diesel::insert_into(subscriptions::table)
                    .values(&row)
                    .returning(SubscriptionDB::as_returning())
                    .get_result::<SubscriptionDB>(conn)
                    .into_core()?;
                Subscription::try_from(saved)
            })
            .await
    }

    fn latest_for_user(&self, user_id: i32) -> Result<Option<Subscription>> {
        let mut conn = get_connection(&self.pool)?;
        // Ids break ties between purchases made within the same second.
        subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .order((subscriptions::created_at.desc(), subscriptions::id.desc()))
            .select(SubscriptionDB::as_select())
            .first::<SubscriptionDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Subscription::try_from)
            .transpose()
    }
}
