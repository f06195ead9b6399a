//! SQLite storage implementation for monthly goals and the goal-setting catalog.

mod model;
mod repository;
mod settings_repository;

pub use model::{
    GoalSettingAnswerDB, GoalSettingQuestionDB, MonthlyGoalDB, NewGoalSettingAnswerDB,
    NewMonthlyGoalDB,
};
pub use repository::MonthlyGoalRepository;
pub use settings_repository::GoalSettingsRepository;
