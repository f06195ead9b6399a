use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use pairgoal_core::subscriptions::{NewSubscription, Subscription, SubscriptionPlan};
use serde::Deserialize;

use crate::{
    auth::AuthenticatedUser,
    error::{ApiJson, ApiResult, Envelope},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct SaveSubscriptionRequest {
    purchase_plan_id: String,
    amount: f64,
    device_name: String,
    plan: SubscriptionPlan,
    receipt: String,
}

async fn save_subscription(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<SaveSubscriptionRequest>,
) -> ApiResult<Json<Envelope<Subscription>>> {
    // Unpaired users may subscribe too; the mapping is attached when present.
    let partner_mapping_id = match state.partner_service.resolve_partner_mapping(caller.user_id) {
        Ok(mapping) => Some(mapping.id),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };
    let subscription = state
        .subscription_service
        .save_subscription(NewSubscription {
            user_id: caller.user_id,
            partner_mapping_id,
            purchase_plan_id: body.purchase_plan_id,
            amount: body.amount,
            device_name: body.device_name,
            plan: body.plan,
            receipt: body.receipt,
        })
        .await?;
    Ok(Envelope::ok_with_message(
        "Subscription saved successfully.",
        subscription,
    ))
}

async fn latest_subscription(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Envelope<Subscription>>> {
    let subscription = state
        .subscription_service
        .get_latest_subscription(caller.user_id)?;
    Ok(Envelope::ok(subscription))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/subscriptions", post(save_subscription))
        .route("/subscriptions/latest", get(latest_subscription))
}
