use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use pairgoal_core::constants::STATUS_ACTIVE;
use pairgoal_core::errors::Result;
use pairgoal_core::goals::{
    GoalSettingAnswer, GoalSettingQuestion, GoalSettingsRepositoryTrait, NewGoalSettingAnswer,
};
use pairgoal_core::utils::time_utils::now_timestamp;

use super::model::{GoalSettingAnswerDB, GoalSettingQuestionDB, NewGoalSettingAnswerDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{goal_setting_answers, goal_settings};

/// Read access to the seeded question catalog plus the append-only answers.
pub struct GoalSettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalSettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalSettingsRepository { pool, writer }
    }
}

#[async_trait]
impl GoalSettingsRepositoryTrait for GoalSettingsRepository {
    fn list_questions(&self) -> Result<Vec<GoalSettingQuestion>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goal_settings::table
            .filter(goal_settings::status.eq(STATUS_ACTIVE))
            .order(goal_settings::id.asc())
            .select(GoalSettingQuestionDB::as_select())
            .load::<GoalSettingQuestionDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(GoalSettingQuestion::from).collect())
    }

    fn get_question(&self, question_id: i32) -> Result<GoalSettingQuestion> {
        let mut conn = get_connection(&self.pool)?;
        goal_settings::table
            .find(question_id)
            .select(GoalSettingQuestionDB::as_select())
            .first::<GoalSettingQuestionDB>(&mut conn)
            .or_not_found(|| format!("No goal setting question found with id {}", question_id))
            .map(GoalSettingQuestion::from)
    }

    async fn insert_answer(&self, answer: NewGoalSettingAnswer) -> Result<GoalSettingAnswer> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GoalSettingAnswer> {
                let row = NewGoalSettingAnswerDB::from_domain(answer, STATUS_ACTIVE, now_timestamp());
                diesel::insert_into(goal_setting_answers::table)
                    .values(&row)
                    .returning(GoalSettingAnswerDB::as_returning())
                    .get_result::<GoalSettingAnswerDB>(conn)
                    .into_core()
                    .map(GoalSettingAnswer::from)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_db;

    #[tokio::test]
    async fn seeded_questions_are_listed_in_order() {
        let (pool, writer, _dir) = setup_db();
        let repo = GoalSettingsRepository::new(pool, writer);

        let questions = repo.list_questions().unwrap();

        assert_eq!(questions.len(), 4);
        assert!(questions.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(repo.get_question(questions[0].id).unwrap(), questions[0]);
        assert!(repo.get_question(999).unwrap_err().is_not_found());
    }
}
