//! Database models for goals.

use chrono::NaiveDate;
use diesel::prelude::*;

use pairgoal_core::goals::{
    GoalSettingAnswer, GoalSettingQuestion, MonthlyGoal, NewGoalSettingAnswer, NewMonthlyGoal,
};

/// Database model for one side of a monthly goal pair
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::monthly_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MonthlyGoalDB {
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

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::monthly_goals)]
pub struct NewMonthlyGoalDB {
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

impl NewMonthlyGoalDB {
    pub fn from_domain(goal: NewMonthlyGoal, now: &str) -> Self {
        Self {
            partner_mapping_id: goal.partner_mapping_id,
            user_id: goal.user_id,
            goal_identifier: goal.goal_identifier,
            month_start: goal.month_start,
            month_end: goal.month_end,
            connect_number: goal.connect_number,
            initiator_count: goal.initiator_count,
            percentage: goal.percentage,
            complete_count: goal.complete_count,
            complete_percentage: goal.complete_percentage,
            status: goal.status,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

impl From<MonthlyGoalDB> for MonthlyGoal {
    fn from(db: MonthlyGoalDB) -> Self {
        Self {
            id: db.id,
            partner_mapping_id: db.partner_mapping_id,
            user_id: db.user_id,
            goal_identifier: db.goal_identifier,
            month_start: db.month_start,
            month_end: db.month_end,
            connect_number: db.connect_number,
            initiator_count: db.initiator_count,
            percentage: db.percentage,
            complete_count: db.complete_count,
            complete_percentage: db.complete_percentage,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goal_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalSettingQuestionDB {
    pub id: i32,
    pub question: String,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GoalSettingQuestionDB> for GoalSettingQuestion {
    fn from(db: GoalSettingQuestionDB) -> Self {
        Self {
            id: db.id,
            question: db.question,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goal_setting_answers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalSettingAnswerDB {
    pub id: i32,
    pub goal_id: i32,
    pub question_id: i32,
    pub answer: String,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::goal_setting_answers)]
pub struct NewGoalSettingAnswerDB {
    pub goal_id: i32,
    pub question_id: i32,
    pub answer: String,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl NewGoalSettingAnswerDB {
    pub fn from_domain(answer: NewGoalSettingAnswer, status: i32, now: String) -> Self {
        Self {
            goal_id: answer.goal_id,
            question_id: answer.question_id,
            answer: answer.answer,
            status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl From<GoalSettingAnswerDB> for GoalSettingAnswer {
    fn from(db: GoalSettingAnswerDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            question_id: db.question_id,
            answer: db.answer,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
