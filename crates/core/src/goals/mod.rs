//! Goals module - the paired monthly goal ledger, goal history and the
//! goal-setting questionnaire.

mod goals_ledger;
mod goals_model;
mod goals_service;
mod goals_traits;


pub use goals_ledger::{
    build_goal_pair, ensure_editable, find_sibling, generate_goal_identifier, partner_split,
    validate_period, validate_split, PairSplit,
};
pub use goals_model::{
    GoalHistoryGroup, GoalPair, GoalSettingAnswer, GoalSettingQuestion, GoalWithUser,
    MonthlyGoal, MonthlyGoalChanges, NewGoalSettingAnswer, NewMonthlyGoal, NewPairedGoal,
    PairedGoalUpdate,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalServiceTrait, GoalSettingsRepositoryTrait, MonthlyGoalRepositoryTrait};
