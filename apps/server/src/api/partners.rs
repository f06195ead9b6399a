use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use pairgoal_core::{partners::PartnerMapping, users::UserProfile};
use serde::Deserialize;

use crate::{
    auth::AuthenticatedUser,
    error::{ApiJson, ApiResult, Envelope},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct LinkRequest {
    unique_code: String,
}

async fn get_mapping(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Envelope<PartnerMapping>>> {
    let mapping = state.partner_service.resolve_partner_mapping(caller.user_id)?;
    Ok(Envelope::ok(mapping))
}

async fn get_partner(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Envelope<UserProfile>>> {
    let partner = state.partner_service.get_partner(caller.user_id)?;
    Ok(Envelope::ok(partner))
}

async fn link_partner(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<LinkRequest>,
) -> ApiResult<Json<Envelope<PartnerMapping>>> {
    let mapping = state
        .partner_service
        .link_by_code(caller.user_id, &body.unique_code)
        .await?;
    tracing::info!(mapping_id = mapping.id, "partners linked");
    Ok(Envelope::ok_with_message("Partner linked successfully.", mapping))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/partners/mapping", get(get_mapping))
        .route("/partners/partner", get(get_partner))
        .route("/partners/link", post(link_partner))
}
