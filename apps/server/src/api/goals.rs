use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use pairgoal_core::goals::{
    GoalHistoryGroup, GoalPair, GoalSettingAnswer, GoalSettingQuestion, GoalWithUser,
    MonthlyGoal, NewPairedGoal, PairedGoalUpdate,
};
use serde::Deserialize;

use crate::{
    auth::AuthenticatedUser,
    error::{ApiError, ApiJson, ApiPath, ApiResult, Envelope},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct CreateGoalRequest {
    month_start: NaiveDate,
    month_end: NaiveDate,
    connect_number: i32,
    initiator_count: i32,
    percentage: i32,
}

#[derive(Deserialize)]
struct AnswerRequest {
    goal_id: i32,
    question_id: i32,
    answer: String,
}

/// Loads a goal only if it belongs to the caller's active mapping.
///
/// Goals of other couples are reported as missing.
fn load_owned_goal(state: &AppState, user_id: i32, goal_id: i32) -> ApiResult<MonthlyGoal> {
    let goal = state.goal_service.get_goal_by_id(goal_id)?;
    let not_found = || ApiError::NotFound(format!("Goal {goal_id} not found"));
    let mapping = match state.partner_service.resolve_partner_mapping(user_id) {
        Ok(mapping) => mapping,
        Err(e) if e.is_not_found() => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };
    if goal.partner_mapping_id != mapping.id {
        return Err(not_found());
    }
    Ok(goal)
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Envelope<Vec<GoalWithUser>>>> {
    let mapping = state.partner_service.resolve_partner_mapping(caller.user_id)?;
    let goals = state.goal_service.get_goal_details_with_users(mapping.id)?;
    Ok(Envelope::ok(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<CreateGoalRequest>,
) -> ApiResult<Json<Envelope<GoalPair>>> {
    let mapping = state.partner_service.resolve_partner_mapping(caller.user_id)?;
    let partner_id = state
        .partner_service
        .resolve_partner_user_id(caller.user_id, &mapping)?;
    let pair = state
        .goal_service
        .create_paired_goal(NewPairedGoal {
            partner_mapping_id: mapping.id,
            user_id: caller.user_id,
            partner_id,
            month_start: body.month_start,
            month_end: body.month_end,
            connect_number: body.connect_number,
            initiator_count: body.initiator_count,
            percentage: body.percentage,
        })
        .await?;
    Ok(Envelope::ok_with_message("Goal created successfully.", pair))
}

async fn goal_history(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Envelope<Vec<GoalHistoryGroup>>>> {
    let history = state.goal_service.get_history_for_user(caller.user_id).await?;
    Ok(Envelope::ok(history))
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiPath(goal_id): ApiPath<i32>,
) -> ApiResult<Json<Envelope<MonthlyGoal>>> {
    let goal = load_owned_goal(&state, caller.user_id, goal_id)?;
    Ok(Envelope::ok(goal))
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiPath(goal_id): ApiPath<i32>,
    ApiJson(update): ApiJson<PairedGoalUpdate>,
) -> ApiResult<Json<Envelope<GoalPair>>> {
    load_owned_goal(&state, caller.user_id, goal_id)?;
    let pair = state.goal_service.update_paired_goal(goal_id, update).await?;
    Ok(Envelope::ok_with_message("Goal updated successfully.", pair))
}

async fn list_questions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<Vec<GoalSettingQuestion>>>> {
    let questions = state.goal_service.list_questions()?;
    Ok(Envelope::ok(questions))
}

async fn get_question(
    State(state): State<Arc<AppState>>,
    ApiPath(question_id): ApiPath<i32>,
) -> ApiResult<Json<Envelope<GoalSettingQuestion>>> {
    let question = state.goal_service.get_question_by_id(question_id)?;
    Ok(Envelope::ok(question))
}

async fn record_answer(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<AnswerRequest>,
) -> ApiResult<Json<Envelope<GoalSettingAnswer>>> {
    load_owned_goal(&state, caller.user_id, body.goal_id)?;
    let answer = state
        .goal_service
        .record_answer(body.goal_id, body.question_id, body.answer)
        .await?;
    Ok(Envelope::ok_with_message("Answer saved successfully.", answer))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/history", get(goal_history))
        .route("/goals/settings", get(list_questions))
        .route("/goals/settings/answers", post(record_answer))
        .route("/goals/settings/{id}", get(get_question))
        .route("/goals/{id}", get(get_goal).put(update_goal))
}
