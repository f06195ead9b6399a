use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use log::{debug, info};
use std::sync::Arc;

use super::goals_ledger::{build_goal_pair, generate_goal_identifier};
use super::goals_model::{
    GoalHistoryGroup, GoalPair, GoalSettingAnswer, GoalSettingQuestion, GoalWithUser,
    MonthlyGoal, NewGoalSettingAnswer, NewPairedGoal, PairedGoalUpdate,
};
use super::goals_traits::{GoalServiceTrait, GoalSettingsRepositoryTrait, MonthlyGoalRepositoryTrait};
use crate::errors::{Result, ValidationError};

pub struct GoalService {
    goal_repository: Arc<dyn MonthlyGoalRepositoryTrait>,
    settings_repository: Arc<dyn GoalSettingsRepositoryTrait>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn MonthlyGoalRepositoryTrait>,
        settings_repository: Arc<dyn GoalSettingsRepositoryTrait>,
    ) -> Self {
        Self {
            goal_repository,
            settings_repository,
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn create_paired_goal(&self, input: NewPairedGoal) -> Result<GoalPair> {
        input.validate()?;
        let goal_identifier =
            generate_goal_identifier(Utc::now().timestamp_millis(), &mut rand::thread_rng());
        let (own, partner) = build_goal_pair(&input, goal_identifier);

        let pair = self.goal_repository.insert_pair(own, partner).await?;
        info!(
            "Created goal pair {} ({} / {}) for mapping {}",
            goal_identifier, pair.goal.id, pair.partner_goal.id, input.partner_mapping_id
        );
        Ok(pair)
    }

    async fn update_paired_goal(&self, goal_id: i32, update: PairedGoalUpdate) -> Result<GoalPair> {
        update.validate()?;
        let pair = self.goal_repository.update_pair(goal_id, update).await?;
        debug!(
            "Updated goal {} and sibling {}",
            pair.goal.id, pair.partner_goal.id
        );
        Ok(pair)
    }

    fn get_goal_by_id(&self, goal_id: i32) -> Result<MonthlyGoal> {
        self.goal_repository.get_by_id(goal_id)
    }

    fn list_active_goals_for_mapping(&self, partner_mapping_id: i32) -> Result<Vec<MonthlyGoal>> {
        self.goal_repository
            .list_active_for_mapping(partner_mapping_id)
    }

    fn get_goal_details_with_users(&self, partner_mapping_id: i32) -> Result<Vec<GoalWithUser>> {
        self.goal_repository
            .list_active_with_users(partner_mapping_id)
    }

    async fn get_history_for_user(&self, user_id: i32) -> Result<Vec<GoalHistoryGroup>> {
        let closed = self.goal_repository.list_closed_for_user(user_id)?;

        // Groups are independent; try_join_all keeps the closed-row order.
        let groups = try_join_all(closed.iter().map(|goal| {
            let repository = self.goal_repository.clone();
            let partner_mapping_id = goal.partner_mapping_id;
            let goal_identifier = goal.goal_identifier;
            async move {
                let goals = repository
                    .load_closed_group(partner_mapping_id, goal_identifier)
                    .await?;
                Ok::<_, crate::Error>(GoalHistoryGroup {
                    goal_identifier,
                    goals,
                })
            }
        }))
        .await?;

        Ok(groups)
    }

    fn list_questions(&self) -> Result<Vec<GoalSettingQuestion>> {
        self.settings_repository.list_questions()
    }

    fn get_question_by_id(&self, question_id: i32) -> Result<GoalSettingQuestion> {
        self.settings_repository.get_question(question_id)
    }

    async fn record_answer(
        &self,
        goal_id: i32,
        question_id: i32,
        answer: String,
    ) -> Result<GoalSettingAnswer> {
        if answer.trim().is_empty() {
            return Err(ValidationError::MissingField("Answer".to_string()).into());
        }
        self.goal_repository.get_by_id(goal_id)?;
        self.settings_repository.get_question(question_id)?;

        self.settings_repository
            .insert_answer(NewGoalSettingAnswer {
                goal_id,
                question_id,
                answer,
            })
            .await
    }
}
