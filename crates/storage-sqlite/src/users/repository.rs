use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use pairgoal_core::constants::{ROLE_APP_USER, STATUS_ACTIVE};
use pairgoal_core::errors::{DatabaseError, Error, Result};
use pairgoal_core::users::{
    user_not_found, NewUserRecord, ProfileUpdate, User, UserRepositoryTrait,
};
use pairgoal_core::utils::time_utils::now_timestamp;

use super::model::{NewUserDB, UserDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::users;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

/// Fails with not-found when an update touched no row.
fn expect_one_row(affected: usize, user_id: i32) -> Result<()> {
    if affected == 0 {
        Err(user_not_found(user_id))
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: i32) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .or_not_found(|| format!("No user found with id {}", user_id))
            .map(User::from)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let found = users::table
            .filter(users::email.eq(email))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(found.map(User::from))
    }

    fn find_by_unique_code(&self, unique_code: &str) -> Result<Option<User>> {
        if unique_code.is_empty() {
            return Ok(None);
        }
        let mut conn = get_connection(&self.pool)?;
        let found = users::table
            .filter(users::unique_code.eq(unique_code))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(found.map(User::from))
    }

    fn list(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64)> {
        let mut conn = get_connection(&self.pool)?;
        let total: i64 = users::table.count().get_result(&mut conn).into_core()?;
        let rows = users::table
            .order(users::id.asc())
            .offset(offset)
            .limit(limit)
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .into_core()?;
        Ok((rows.into_iter().map(User::from).collect(), total))
    }

    fn list_holding_codes(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .filter(users::role_id.eq(ROLE_APP_USER))
            .filter(users::status.eq(STATUS_ACTIVE))
            .filter(users::unique_code.ne(""))
            .order(users::id.asc())
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn insert(&self, record: NewUserRecord) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let email = record.email.clone();
                let row = NewUserDB::from_record(record, now_timestamp());
                let inserted = diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserDB::as_returning())
                    .get_result::<UserDB>(conn)
                    .into_core()
                    .map_err(|e| match e {
                        Error::Database(DatabaseError::UniqueViolation(_)) => {
                            Error::ConstraintViolation(format!(
                                "Email-Id already exists: {}",
                                email
                            ))
                        }
                        other => other,
                    })?;
                Ok(User::from(inserted))
            })
            .await
    }

    async fn update_profile(&self, user_id: i32, update: ProfileUpdate) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::update(users::table.find(user_id))
                    .set((
                        users::first_name.eq(update.first_name),
                        users::last_name.eq(update.last_name),
                        users::updated_at.eq(now_timestamp()),
                    ))
                    .returning(UserDB::as_returning())
                    .get_result::<UserDB>(conn)
                    .or_not_found(|| format!("No user found with id {}", user_id))
                    .map(User::from)
            })
            .await
    }

    async fn update_password(&self, user_id: i32, password_hash: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::update(users::table.find(user_id))
                    .set((
                        users::password.eq(password_hash),
                        users::updated_at.eq(now_timestamp()),
                    ))
                    .execute(conn)
                    .into_core()?;
                expect_one_row(affected, user_id)
            })
            .await
    }

    async fn update_profile_image(&self, user_id: i32, file_name: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::update(users::table.find(user_id))
                    .set((
                        users::profile_image.eq(Some(file_name)),
                        users::updated_at.eq(now_timestamp()),
                    ))
                    .execute(conn)
                    .into_core()?;
                expect_one_row(affected, user_id)
            })
            .await
    }

    async fn update_fcm_id(&self, user_id: i32, fcm_id: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::update(users::table.find(user_id))
                    .set((
                        users::fcm_id.eq(Some(fcm_id)),
                        users::updated_at.eq(now_timestamp()),
                    ))
                    .execute(conn)
                    .into_core()?;
                expect_one_row(affected, user_id)
            })
            .await
    }

    async fn clear_unique_codes(&self, user_ids: Vec<i32>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::update(users::table.filter(users::id.eq_any(user_ids)))
                    .set((
                        users::unique_code.eq(""),
                        users::updated_at.eq(now_timestamp()),
                    ))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_user_record, setup_db};

    async fn repository() -> (UserRepository, tempfile::TempDir) {
        let (pool, writer, dir) = setup_db();
        (UserRepository::new(pool, writer), dir)
    }

    #[tokio::test]
    async fn insert_and_fetch() {
        let (repo, _dir) = repository().await;

        let user = repo
            .insert(new_user_record("anna@example.com", "ABCD"))
            .await
            .unwrap();

        assert!(user.id > 0);
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(repo.get_by_id(user.id).unwrap().email, "anna@example.com");
        assert!(repo.find_by_email("anna@example.com").unwrap().is_some());
        assert_eq!(repo.find_by_unique_code("ABCD").unwrap().unwrap().id, user.id);
        assert!(repo.get_by_id(999).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (repo, _dir) = repository().await;
        repo.insert(new_user_record("anna@example.com", "ABCD"))
            .await
            .unwrap();

        let err = repo
            .insert(new_user_record("anna@example.com", "EFGH"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn cleared_codes_stop_matching() {
        let (repo, _dir) = repository().await;
        let anna = repo
            .insert(new_user_record("anna@example.com", "ABCD"))
            .await
            .unwrap();
        let ben = repo
            .insert(new_user_record("ben@example.com", "WXYZ"))
            .await
            .unwrap();
        repo.insert(new_user_record("cleo@example.com", "QRST"))
            .await
            .unwrap();

        let cleared = repo.clear_unique_codes(vec![anna.id, ben.id]).await.unwrap();

        assert_eq!(cleared, 2);
        assert!(repo.find_by_unique_code("ABCD").unwrap().is_none());
        assert!(repo.find_by_unique_code("").unwrap().is_none());
        let holders: Vec<String> = repo
            .list_holding_codes()
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(holders, vec!["cleo@example.com".to_string()]);
    }

    #[tokio::test]
    async fn updates_touch_only_their_columns() {
        let (repo, _dir) = repository().await;
        let user = repo
            .insert(new_user_record("anna@example.com", "ABCD"))
            .await
            .unwrap();

        let updated = repo
            .update_profile(
                user.id,
                ProfileUpdate {
                    first_name: "Annie".to_string(),
                    last_name: "Lee".to_string(),
                },
            )
            .await
            .unwrap();
        repo.update_fcm_id(user.id, "fcm-token".to_string())
            .await
            .unwrap();
        repo.update_profile_image(user.id, "user_photo-1700000000000.png".to_string())
            .await
            .unwrap();

        let stored = repo.get_by_id(user.id).unwrap();
        assert_eq!(updated.first_name, "Annie");
        assert_eq!(stored.fcm_id.as_deref(), Some("fcm-token"));
        assert_eq!(
            stored.profile_image.as_deref(),
            Some("user_photo-1700000000000.png")
        );
        assert_eq!(stored.email, "anna@example.com");
        assert_eq!(stored.created_at, user.created_at);
    }

    #[tokio::test]
    async fn updating_missing_user_is_not_found() {
        let (repo, _dir) = repository().await;

        let err = repo
            .update_password(42, "hash".to_string())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_pages_in_id_order() {
        let (repo, _dir) = repository().await;
        for (email, code) in [("a@example.com", "AAAA"), ("b@example.com", "BBBB"), ("c@example.com", "CCCC")] {
            repo.insert(new_user_record(email, code)).await.unwrap();
        }

        let (page, total) = repo.list(1, 1).unwrap();

        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].email, "b@example.com");
    }
}
