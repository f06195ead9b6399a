use async_trait::async_trait;

use super::goals_model::{
    GoalHistoryGroup, GoalPair, GoalSettingAnswer, GoalSettingQuestion, GoalWithUser,
    MonthlyGoal, NewGoalSettingAnswer, NewMonthlyGoal, NewPairedGoal, PairedGoalUpdate,
};
use crate::errors::Result;

/// Trait for monthly goal repository operations
#[async_trait]
pub trait MonthlyGoalRepositoryTrait: Send + Sync {
    fn get_by_id(&self, goal_id: i32) -> Result<MonthlyGoal>;

    /// Active rows of a mapping, in id order.
    fn list_active_for_mapping(&self, partner_mapping_id: i32) -> Result<Vec<MonthlyGoal>>;

    /// Active rows of a mapping joined to their owners.
    fn list_active_with_users(&self, partner_mapping_id: i32) -> Result<Vec<GoalWithUser>>;

    /// Closed rows owned by a user, in id order.
    fn list_closed_for_user(&self, user_id: i32) -> Result<Vec<MonthlyGoal>>;

    /// Closed rows of one mapping sharing a goal identifier, joined to their owners.
    async fn load_closed_group(
        &self,
        partner_mapping_id: i32,
        goal_identifier: i64,
    ) -> Result<Vec<GoalWithUser>>;

    /// Closes the mapping's active pair, if any, and inserts both rows of the
    /// new pair, all in one transaction.
    async fn insert_pair(&self, own: NewMonthlyGoal, partner: NewMonthlyGoal) -> Result<GoalPair>;

    /// Rewrites `goal_id` with `update` and its sibling with the complementary
    /// split, reading and writing inside one transaction.
    async fn update_pair(&self, goal_id: i32, update: PairedGoalUpdate) -> Result<GoalPair>;
}

/// Trait for the goal-setting question catalog and its answers
#[async_trait]
pub trait GoalSettingsRepositoryTrait: Send + Sync {
    fn list_questions(&self) -> Result<Vec<GoalSettingQuestion>>;
    fn get_question(&self, question_id: i32) -> Result<GoalSettingQuestion>;
    async fn insert_answer(&self, answer: NewGoalSettingAnswer) -> Result<GoalSettingAnswer>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn create_paired_goal(&self, input: NewPairedGoal) -> Result<GoalPair>;
    async fn update_paired_goal(&self, goal_id: i32, update: PairedGoalUpdate) -> Result<GoalPair>;
    fn get_goal_by_id(&self, goal_id: i32) -> Result<MonthlyGoal>;
    fn list_active_goals_for_mapping(&self, partner_mapping_id: i32) -> Result<Vec<MonthlyGoal>>;
    fn get_goal_details_with_users(&self, partner_mapping_id: i32) -> Result<Vec<GoalWithUser>>;
    async fn get_history_for_user(&self, user_id: i32) -> Result<Vec<GoalHistoryGroup>>;
    fn list_questions(&self) -> Result<Vec<GoalSettingQuestion>>;
    fn get_question_by_id(&self, question_id: i32) -> Result<GoalSettingQuestion>;
    async fn record_answer(
        &self,
        goal_id: i32,
        question_id: i32,
        answer: String,
    ) -> Result<GoalSettingAnswer>;
}
