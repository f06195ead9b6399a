use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use pairgoal_core::constants::STATUS_ACTIVE;
use pairgoal_core::errors::{Error, Result};
use pairgoal_core::partners::{NewPartnerMapping, PartnerMapping, PartnerRepositoryTrait};
use pairgoal_core::utils::time_utils::now_timestamp;

use super::model::{NewPartnerMappingDB, PartnerMappingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::partner_mappings;

pub struct PartnerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PartnerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PartnerRepository { pool, writer }
    }
}

/// Active mappings with `user_id` on either side.
fn active_for_user(conn: &mut SqliteConnection, user_id: i32) -> Result<Vec<PartnerMappingDB>> {
    partner_mappings::table
        .filter(partner_mappings::status.eq(STATUS_ACTIVE))
        .filter(
            partner_mappings::partner_one_id
                .eq(user_id)
                .or(partner_mappings::partner_two_id.eq(user_id)),
        )
        .order(partner_mappings::id.asc())
        .select(PartnerMappingDB::as_select())
        .load::<PartnerMappingDB>(conn)
        .into_core()
}

#[async_trait]
impl PartnerRepositoryTrait for PartnerRepository {
    fn get_by_id(&self, mapping_id: i32) -> Result<PartnerMapping> {
        let mut conn = get_connection(&self.pool)?;
        partner_mappings::table
            .find(mapping_id)
            .select(PartnerMappingDB::as_select())
            .first::<PartnerMappingDB>(&mut conn)
            .or_not_found(|| format!("No partner mapping found with id {}", mapping_id))
            .map(PartnerMapping::from)
    }

    fn list_active_for_user(&self, user_id: i32) -> Result<Vec<PartnerMapping>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(active_for_user(&mut conn, user_id)?
            .into_iter()
            .map(PartnerMapping::from)
            .collect())
    }

    async fn insert_exclusive(&self, new_mapping: NewPartnerMapping) -> Result<PartnerMapping> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PartnerMapping> {
                for user_id in [new_mapping.partner_one_id, new_mapping.partner_two_id] {
                    if !active_for_user(conn, user_id)?.is_empty() {
                        return Err(Error::ConstraintViolation(format!(
                            "User {} already has a partner",
                            user_id
                        )));
                    }
                }

                let now = now_timestamp();
                let row = NewPartnerMappingDB {
                    partner_one_id: new_mapping.partner_one_id,
                    partner_two_id: new_mapping.partner_two_id,
                    status: STATUS_ACTIVE,
                    created_at: now.clone(),
                    updated_at: now,
                };
                diesel::insert_into(partner_mappings::table)
                    .values(&row)
                    .returning(PartnerMappingDB::as_returning())
                    .get_result::<PartnerMappingDB>(conn)
                    .into_core()
                    .map(PartnerMapping::from)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_user_record, setup_db};
    use crate::users::UserRepository;
    use pairgoal_core::users::UserRepositoryTrait;

    async fn fixture() -> (PartnerRepository, Vec<i32>, tempfile::TempDir) {
        let (pool, writer, dir) = setup_db();
        let users = UserRepository::new(pool.clone(), writer.clone());
        let mut ids = Vec::new();
        for (email, code) in [
            ("anna@example.com", "ABCD"),
            ("ben@example.com", "WXYZ"),
            ("cleo@example.com", "QRST"),
        ] {
            ids.push(users.insert(new_user_record(email, code)).await.unwrap().id);
        }
        (PartnerRepository::new(pool, writer), ids, dir)
    }

    #[tokio::test]
    async fn mapping_is_visible_from_both_sides() {
        let (repo, ids, _dir) = fixture().await;

        let mapping = repo
            .insert_exclusive(NewPartnerMapping {
                partner_one_id: ids[0],
                partner_two_id: ids[1],
            })
            .await
            .unwrap();

        assert!(mapping.is_active());
        assert_eq!(repo.list_active_for_user(ids[0]).unwrap(), vec![mapping.clone()]);
        assert_eq!(repo.list_active_for_user(ids[1]).unwrap(), vec![mapping.clone()]);
        assert!(repo.list_active_for_user(ids[2]).unwrap().is_empty());
        assert_eq!(repo.get_by_id(mapping.id).unwrap(), mapping);
    }

    #[tokio::test]
    async fn second_mapping_for_a_paired_user_is_rejected() {
        let (repo, ids, _dir) = fixture().await;
        repo.insert_exclusive(NewPartnerMapping {
            partner_one_id: ids[0],
            partner_two_id: ids[1],
        })
        .await
        .unwrap();

        let err = repo
            .insert_exclusive(NewPartnerMapping {
                partner_one_id: ids[2],
                partner_two_id: ids[1],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert!(repo.list_active_for_user(ids[2]).unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_pairings_admit_only_one() {
        let (repo, ids, _dir) = fixture().await;
        let repo = Arc::new(repo);

        let attempts = [(ids[0], ids[1]), (ids[2], ids[1])].map(|(one, two)| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.insert_exclusive(NewPartnerMapping {
                    partner_one_id: one,
                    partner_two_id: two,
                })
                .await
            })
        });

        let mut successes = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(repo.list_active_for_user(ids[1]).unwrap().len(), 1);
    }
}
