//! Monthly goal and goal-setting domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::users::UserProfile;

/// One partner's half of a monthly goal. Always stored next to a sibling row
/// sharing `goal_identifier` and `partner_mapping_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyGoal {
    pub id: i32,
    pub partner_mapping_id: i32,
    pub user_id: i32,
    pub goal_identifier: i64,
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub connect_number: i32,
    pub initiator_count: i32,
    pub percentage: i32,
    pub complete_count: i32,
    pub complete_percentage: i32,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a goal pair on behalf of `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPairedGoal {
    pub partner_mapping_id: i32,
    pub user_id: i32,
    pub partner_id: i32,
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub connect_number: i32,
    pub initiator_count: i32,
    pub percentage: i32,
}

/// Row-level insert produced from a `NewPairedGoal`, one per partner.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMonthlyGoal {
    pub partner_mapping_id: i32,
    pub user_id: i32,
    pub goal_identifier: i64,
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub connect_number: i32,
    pub initiator_count: i32,
    pub percentage: i32,
    pub complete_count: i32,
    pub complete_percentage: i32,
    pub status: i32,
}

/// Fields a caller may change on one side of a pair. The other side is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairedGoalUpdate {
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub connect_number: i32,
    pub initiator_count: i32,
    pub percentage: i32,
}

/// Values written to one row of a pair during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyGoalChanges {
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub connect_number: i32,
    pub initiator_count: i32,
    pub percentage: i32,
}

/// Both rows of a pair: the caller's row first, the partner's row second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalPair {
    pub goal: MonthlyGoal,
    pub partner_goal: MonthlyGoal,
}

/// A goal row decorated with its owner's public profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalWithUser {
    #[serde(flatten)]
    pub goal: MonthlyGoal,
    pub user: UserProfile,
}

/// Closed rows sharing one goal identifier, typically self and partner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalHistoryGroup {
    pub goal_identifier: i64,
    pub goals: Vec<GoalWithUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalSettingQuestion {
    pub id: i32,
    pub question: String,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalSettingAnswer {
    pub id: i32,
    pub goal_id: i32,
    pub question_id: i32,
    pub answer: String,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoalSettingAnswer {
    pub goal_id: i32,
    pub question_id: i32,
    pub answer: String,
}
