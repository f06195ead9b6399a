use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{info, warn};
use std::sync::Arc;

use pairgoal_core::constants::{STATUS_ACTIVE, STATUS_INACTIVE};
use pairgoal_core::errors::{Error, Result};
use pairgoal_core::goals::{
    ensure_editable, find_sibling, GoalPair, GoalWithUser, MonthlyGoal, MonthlyGoalChanges,
    MonthlyGoalRepositoryTrait, NewMonthlyGoal, PairedGoalUpdate,
};
use pairgoal_core::users::UserProfile;
use pairgoal_core::utils::time_utils::now_timestamp;

use super::model::{MonthlyGoalDB, NewMonthlyGoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{monthly_goals, users};
use crate::users::UserDB;

pub struct MonthlyGoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MonthlyGoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MonthlyGoalRepository { pool, writer }
    }
}

fn goal_not_found(goal_id: i32) -> String {
    format!("No goal found with id {}", goal_id)
}

fn load_goal(conn: &mut SqliteConnection, goal_id: i32) -> Result<MonthlyGoal> {
    monthly_goals::table
        .find(goal_id)
        .select(MonthlyGoalDB::as_select())
        .first::<MonthlyGoalDB>(conn)
        .or_not_found(|| goal_not_found(goal_id))
        .map(MonthlyGoal::from)
}

fn active_for_mapping(conn: &mut SqliteConnection, partner_mapping_id: i32) -> Result<Vec<MonthlyGoal>> {
    let rows = monthly_goals::table
        .filter(monthly_goals::partner_mapping_id.eq(partner_mapping_id))
        .filter(monthly_goals::status.eq(STATUS_ACTIVE))
        .order(monthly_goals::id.asc())
        .select(MonthlyGoalDB::as_select())
        .load::<MonthlyGoalDB>(conn)
        .into_core()?;
    Ok(rows.into_iter().map(MonthlyGoal::from).collect())
}

fn with_users(rows: Vec<(MonthlyGoalDB, UserDB)>) -> Vec<GoalWithUser> {
    rows.into_iter()
        .map(|(goal, user)| GoalWithUser {
            goal: goal.into(),
            user: UserProfile::from(user),
        })
        .collect()
}

/// Writes `changes` to one row and resets its progress.
fn apply_changes(
    conn: &mut SqliteConnection,
    goal_id: i32,
    changes: MonthlyGoalChanges,
    now: &str,
) -> Result<MonthlyGoal> {
    diesel::update(monthly_goals::table.find(goal_id))
        .set((
            monthly_goals::month_start.eq(changes.month_start),
            monthly_goals::month_end.eq(changes.month_end),
            monthly_goals::connect_number.eq(changes.connect_number),
            monthly_goals::initiator_count.eq(changes.initiator_count),
            monthly_goals::percentage.eq(changes.percentage),
            monthly_goals::complete_count.eq(0),
            monthly_goals::complete_percentage.eq(0),
            monthly_goals::status.eq(STATUS_ACTIVE),
            monthly_goals::updated_at.eq(now),
        ))
        .returning(MonthlyGoalDB::as_returning())
        .get_result::<MonthlyGoalDB>(conn)
        .or_not_found(|| goal_not_found(goal_id))
        .map(MonthlyGoal::from)
}

#[async_trait]
impl MonthlyGoalRepositoryTrait for MonthlyGoalRepository {
    fn get_by_id(&self, goal_id: i32) -> Result<MonthlyGoal> {
        let mut conn = get_connection(&self.pool)?;
        load_goal(&mut conn, goal_id)
    }

    fn list_active_for_mapping(&self, partner_mapping_id: i32) -> Result<Vec<MonthlyGoal>> {
        let mut conn = get_connection(&self.pool)?;
        active_for_mapping(&mut conn, partner_mapping_id)
    }

    fn list_active_with_users(&self, partner_mapping_id: i32) -> Result<Vec<GoalWithUser>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = monthly_goals::table
            .inner_join(users::table)
            .filter(monthly_goals::partner_mapping_id.eq(partner_mapping_id))
            .filter(monthly_goals::status.eq(STATUS_ACTIVE))
            .order(monthly_goals::id.asc())
            .select((MonthlyGoalDB::as_select(), UserDB::as_select()))
            .load::<(MonthlyGoalDB, UserDB)>(&mut conn)
            .into_core()?;
        Ok(with_users(rows))
    }

    fn list_closed_for_user(&self, user_id: i32) -> Result<Vec<MonthlyGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = monthly_goals::table
            .filter(monthly_goals::user_id.eq(user_id))
            .filter(monthly_goals::status.eq(STATUS_INACTIVE))
            .order(monthly_goals::id.asc())
            .select(MonthlyGoalDB::as_select())
            .load::<MonthlyGoalDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(MonthlyGoal::from).collect())
    }

    async fn load_closed_group(
        &self,
        partner_mapping_id: i32,
        goal_identifier: i64,
    ) -> Result<Vec<GoalWithUser>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<GoalWithUser>> {
            let mut conn = get_connection(&pool)?;
            let rows = monthly_goals::table
                .inner_join(users::table)
                .filter(monthly_goals::partner_mapping_id.eq(partner_mapping_id))
                .filter(monthly_goals::goal_identifier.eq(goal_identifier))
                .filter(monthly_goals::status.eq(STATUS_INACTIVE))
                .order(monthly_goals::id.asc())
                .select((MonthlyGoalDB::as_select(), UserDB::as_select()))
                .load::<(MonthlyGoalDB, UserDB)>(&mut conn)
                .into_core()?;
            Ok(with_users(rows))
        })
        .await
        .map_err(|e| Error::Unexpected(format!("Goal history lookup failed: {}", e)))?
    }

    async fn insert_pair(&self, own: NewMonthlyGoal, partner: NewMonthlyGoal) -> Result<GoalPair> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GoalPair> {
                let now = now_timestamp();
                let partner_mapping_id = own.partner_mapping_id;
                let retired = diesel::update(
                    monthly_goals::table
                        .filter(monthly_goals::partner_mapping_id.eq(partner_mapping_id))
                        .filter(monthly_goals::status.eq(STATUS_ACTIVE)),
                )
                .set((
                    monthly_goals::status.eq(STATUS_INACTIVE),
                    monthly_goals::updated_at.eq(now.as_str()),
                ))
                .execute(conn)
                .into_core()?;
                if retired > 0 {
                    info!(
                        "Closed {} active goal rows of mapping {}",
                        retired, partner_mapping_id
                    );
                }

                let mut inserted = Vec::with_capacity(2);
                for row in [own, partner] {
                    let saved = diesel::insert_into(monthly_goals::table)
                        .values(NewMonthlyGoalDB::from_domain(row, &now))
                        .returning(MonthlyGoalDB::as_returning())
                        .get_result::<MonthlyGoalDB>(conn)
                        .into_core()?;
                    inserted.push(MonthlyGoal::from(saved));
                }
                let partner_goal = inserted.pop();
                let goal = inserted.pop();
                match (goal, partner_goal) {
                    (Some(goal), Some(partner_goal)) => Ok(GoalPair { goal, partner_goal }),
                    _ => Err(Error::Unexpected("Goal pair insert returned no rows".to_string())),
                }
            })
            .await
    }

    async fn update_pair(&self, goal_id: i32, update: PairedGoalUpdate) -> Result<GoalPair> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GoalPair> {
                let target = load_goal(conn, goal_id)?;
                ensure_editable(&target)?;
                let rows = active_for_mapping(conn, target.partner_mapping_id)?;
                let sibling_id = match find_sibling(&rows, goal_id) {
                    Ok(sibling) => sibling.id,
                    Err(e) => {
                        warn!("Refusing to update goal {}: {}", goal_id, e);
                        return Err(e);
                    }
                };

                let (own, sibling) = update.pair_changes();
                let now = now_timestamp();
                let goal = apply_changes(conn, goal_id, own, &now)?;
                let partner_goal = apply_changes(conn, sibling_id, sibling, &now)?;
                Ok(GoalPair { goal, partner_goal })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partners::PartnerRepository;
    use crate::test_support::{new_user_record, setup_db};
    use crate::users::UserRepository;
    use chrono::NaiveDate;
    use pairgoal_core::goals::build_goal_pair;
    use pairgoal_core::goals::NewPairedGoal;
    use pairgoal_core::partners::{NewPartnerMapping, PartnerRepositoryTrait};
    use pairgoal_core::users::UserRepositoryTrait;

    struct Fixture {
        repo: MonthlyGoalRepository,
        pool: Arc<DbPool>,
        mapping_id: i32,
        anna: i32,
        ben: i32,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let (pool, writer, dir) = setup_db();
        let users = UserRepository::new(pool.clone(), writer.clone());
        let anna = users
            .insert(new_user_record("anna@example.com", "ABCD"))
            .await
            .unwrap()
            .id;
        let ben = users
            .insert(new_user_record("ben@example.com", "WXYZ"))
            .await
            .unwrap()
            .id;
        let mapping_id = PartnerRepository::new(pool.clone(), writer.clone())
            .insert_exclusive(NewPartnerMapping {
                partner_one_id: anna,
                partner_two_id: ben,
            })
            .await
            .unwrap()
            .id;
        Fixture {
            repo: MonthlyGoalRepository::new(pool.clone(), writer),
            pool,
            mapping_id,
            anna,
            ben,
            _dir: dir,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january(f: &Fixture) -> NewPairedGoal {
        NewPairedGoal {
            partner_mapping_id: f.mapping_id,
            user_id: f.anna,
            partner_id: f.ben,
            month_start: date(2024, 1, 1),
            month_end: date(2024, 1, 31),
            connect_number: 8,
            initiator_count: 5,
            percentage: 60,
        }
    }

    async fn insert_january(f: &Fixture, goal_identifier: i64) -> GoalPair {
        let (own, partner) = build_goal_pair(&january(f), goal_identifier);
        f.repo.insert_pair(own, partner).await.unwrap()
    }

    fn close_all(f: &Fixture) {
        let mut conn = get_connection(&f.pool).unwrap();
        diesel::update(monthly_goals::table)
            .set(monthly_goals::status.eq(STATUS_INACTIVE))
            .execute(&mut conn)
            .unwrap();
    }

    #[tokio::test]
    async fn pair_is_inserted_with_complementary_split() {
        let f = fixture().await;

        let pair = insert_january(&f, 1_700_000_000_123).await;

        assert_eq!(pair.goal.user_id, f.anna);
        assert_eq!((pair.goal.initiator_count, pair.goal.percentage), (5, 60));
        assert_eq!(pair.partner_goal.user_id, f.ben);
        assert_eq!(
            (pair.partner_goal.initiator_count, pair.partner_goal.percentage),
            (3, 40)
        );
        assert_eq!(pair.goal.month_start, date(2024, 1, 1));
        assert_eq!(f.repo.list_active_for_mapping(f.mapping_id).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_from_partner_side_rewrites_both_rows() {
        let f = fixture().await;
        let pair = insert_january(&f, 42).await;
        {
            let mut conn = get_connection(&f.pool).unwrap();
            diesel::update(monthly_goals::table)
                .set((
                    monthly_goals::complete_count.eq(2),
                    monthly_goals::complete_percentage.eq(25),
                ))
                .execute(&mut conn)
                .unwrap();
        }

        let updated = f
            .repo
            .update_pair(
                pair.partner_goal.id,
                PairedGoalUpdate {
                    month_start: date(2024, 2, 1),
                    month_end: date(2024, 2, 29),
                    connect_number: 10,
                    initiator_count: 7,
                    percentage: 30,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.goal.id, pair.partner_goal.id);
        assert_eq!((updated.goal.initiator_count, updated.goal.percentage), (7, 30));
        assert_eq!(updated.partner_goal.id, pair.goal.id);
        assert_eq!(
            (updated.partner_goal.initiator_count, updated.partner_goal.percentage),
            (3, 70)
        );
        for row in f.repo.list_active_for_mapping(f.mapping_id).unwrap() {
            assert_eq!(row.complete_count, 0);
            assert_eq!(row.complete_percentage, 0);
            assert_eq!(row.connect_number, 10);
            assert_eq!(row.month_end, date(2024, 2, 29));
            assert_eq!(row.goal_identifier, 42);
        }
    }

    #[tokio::test]
    async fn update_with_missing_sibling_changes_nothing() {
        let f = fixture().await;
        let pair = insert_january(&f, 42).await;
        {
            let mut conn = get_connection(&f.pool).unwrap();
            diesel::update(monthly_goals::table.find(pair.partner_goal.id))
                .set(monthly_goals::status.eq(STATUS_INACTIVE))
                .execute(&mut conn)
                .unwrap();
        }

        let err = f
            .repo
            .update_pair(
                pair.goal.id,
                PairedGoalUpdate {
                    month_start: date(2024, 1, 1),
                    month_end: date(2024, 1, 31),
                    connect_number: 8,
                    initiator_count: 1,
                    percentage: 10,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DataIntegrity(_)));
        let untouched = f.repo.get_by_id(pair.goal.id).unwrap();
        assert_eq!(untouched.initiator_count, 5);
        assert_eq!(untouched.percentage, 60);
    }

    #[tokio::test]
    async fn update_of_unknown_goal_is_not_found() {
        let f = fixture().await;

        let err = f
            .repo
            .update_pair(
                404,
                PairedGoalUpdate {
                    month_start: date(2024, 1, 1),
                    month_end: date(2024, 1, 31),
                    connect_number: 8,
                    initiator_count: 1,
                    percentage: 10,
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn active_rows_come_with_their_owners() {
        let f = fixture().await;
        insert_january(&f, 42).await;

        let rows = f.repo.list_active_with_users(f.mapping_id).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user.email, "anna@example.com");
        assert_eq!(rows[1].user.email, "ben@example.com");
        assert!(rows.iter().all(|r| r.user.id == r.goal.user_id));
    }

    #[tokio::test]
    async fn closed_rows_feed_history() {
        let f = fixture().await;
        insert_january(&f, 111).await;
        insert_january(&f, 222).await;
        close_all(&f);
        insert_january(&f, 333).await;

        let closed = f.repo.list_closed_for_user(f.anna).unwrap();
        let identifiers: Vec<i64> = closed.iter().map(|g| g.goal_identifier).collect();
        assert_eq!(identifiers, vec![111, 222]);

        let group = f.repo.load_closed_group(f.mapping_id, 111).await.unwrap();
        assert_eq!(group.len(), 2);
        assert!(group.iter().all(|g| g.goal.goal_identifier == 111));
        assert!(f
            .repo
            .load_closed_group(f.mapping_id, 333)
            .await
            .unwrap()
            .is_empty());
        assert!(f
            .repo
            .load_closed_group(f.mapping_id + 1, 111)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn new_pair_closes_the_current_one() {
        let f = fixture().await;
        let first = insert_january(&f, 111).await;

        let second = insert_january(&f, 222).await;

        let active = f.repo.list_active_for_mapping(f.mapping_id).unwrap();
        let active_ids: Vec<i32> = active.iter().map(|g| g.id).collect();
        assert_eq!(active_ids, vec![second.goal.id, second.partner_goal.id]);
        assert_eq!(f.repo.get_by_id(first.goal.id).unwrap().status, STATUS_INACTIVE);
        assert_eq!(
            f.repo.get_by_id(first.partner_goal.id).unwrap().status,
            STATUS_INACTIVE
        );

        let updated = f
            .repo
            .update_pair(
                second.goal.id,
                PairedGoalUpdate {
                    month_start: date(2024, 1, 1),
                    month_end: date(2024, 1, 31),
                    connect_number: 8,
                    initiator_count: 2,
                    percentage: 20,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.partner_goal.id, second.partner_goal.id);
        assert_eq!(updated.partner_goal.percentage, 80);

        let history = f.repo.load_closed_group(f.mapping_id, 111).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn closed_goal_update_is_rejected_as_invalid() {
        let f = fixture().await;
        let old = insert_january(&f, 111).await;
        insert_january(&f, 222).await;

        let err = f
            .repo
            .update_pair(
                old.goal.id,
                PairedGoalUpdate {
                    month_start: date(2024, 1, 1),
                    month_end: date(2024, 1, 31),
                    connect_number: 8,
                    initiator_count: 1,
                    percentage: 10,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        let untouched = f.repo.get_by_id(old.goal.id).unwrap();
        assert_eq!(untouched.status, STATUS_INACTIVE);
        assert_eq!(untouched.percentage, 60);
    }
}
