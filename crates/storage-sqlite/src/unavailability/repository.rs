use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use pairgoal_core::constants::STATUS_ACTIVE;
use pairgoal_core::errors::Result;
use pairgoal_core::unavailability::{
    NewUnavailability, Unavailability, UnavailabilityRepositoryTrait,
};
use pairgoal_core::utils::time_utils::now_timestamp;

use super::model::{NewUnavailabilityDB, UnavailabilityDB};
use crate::db::WriteHandle;
use crate::errors::IntoCore;
use crate::schema::unavailabilities;

pub struct UnavailabilityRepository {
    writer: WriteHandle,
}

impl UnavailabilityRepository {
    pub fn new(writer: WriteHandle) -> Self {
        UnavailabilityRepository { writer }
    }
}

#[async_trait]
impl UnavailabilityRepositoryTrait for UnavailabilityRepository {
    async fn insert(&self, new_unavailability: NewUnavailability) -> Result<Unavailability> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Unavailability> {
                let row =
                    NewUnavailabilityDB::from_domain(new_unavailability, STATUS_ACTIVE, now_timestamp());
                diesel::insert_into(unavailabilities::table)
                    .values(&row)
                    .returning(UnavailabilityDB::as_returning())
                    .get_result::<UnavailabilityDB>(conn)
                    .into_core()
                    .map(Unavailability::from)
            })
            .await
    }
}
