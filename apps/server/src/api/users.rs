use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use pairgoal_core::{
    constants::STATUS_ACTIVE,
    unavailability::{NewUnavailability, Unavailability},
    users::{NewUser, ProfileUpdate, User, UserProfile},
    utils::time_utils::parse_timestamp,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    auth::{
        hash_password_blocking, verify_password_blocking, AuthError, AuthenticatedUser, TokenPair,
    },
    error::{ApiError, ApiJson, ApiPath, ApiResult, Envelope},
    main_lib::AppState,
};

const PROFILE_IMAGE_FIELD: &str = "user_photo";
const MAX_PROFILE_IMAGE_BYTES: usize = 250_000;

#[derive(Deserialize)]
struct RegisterRequest {
    first_name: String,
    last_name: String,
    gender: String,
    email: String,
    password: String,
    confirm_password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Deserialize)]
struct ChangePasswordRequest {
    new_password: String,
    confirm_password: String,
}

#[derive(Deserialize)]
struct FcmIdRequest {
    fcm_id: String,
}

#[derive(Deserialize)]
struct UnavailabilityRequest {
    unavailability_start: String,
    unavailability_end: String,
}

/// Own account view. Unlike `UserProfile` it carries the pairing code.
#[derive(Serialize)]
struct SessionResponse {
    user: User,
    #[serde(flatten)]
    tokens: TokenPair,
}

#[derive(Serialize)]
struct AccessTokenResponse {
    token: String,
    expires_in: u64,
}

fn require_password_pair(
    password: &str,
    confirm: &str,
    mismatch_message: &str,
) -> ApiResult<()> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password is required".into()));
    }
    if password != confirm {
        return Err(ApiError::BadRequest(mismatch_message.into()));
    }
    Ok(())
}

async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<Json<Envelope<SessionResponse>>> {
    require_password_pair(
        &body.password,
        &body.confirm_password,
        "Password and confirm password should be same.",
    )?;
    let password_hash = hash_password_blocking(body.password).await?;
    let user = state
        .user_service
        .register(NewUser {
            first_name: body.first_name,
            last_name: body.last_name,
            gender: body.gender,
            email: body.email,
            password_hash,
        })
        .await?;
    let tokens = state.auth.issue_pair(user.id)?;
    tracing::info!(user_id = user.id, "user registered");
    Ok(Envelope::ok_with_message(
        "Registered successfully.",
        SessionResponse {
            user,
            tokens,
        },
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<Envelope<SessionResponse>>> {
    let user = match state.user_service.get_user_by_email(&body.email) {
        Ok(user) => user,
        Err(e) if e.is_not_found() => return Err(AuthError::InvalidCredentials.into()),
        Err(e) => return Err(e.into()),
    };
    verify_password_blocking(user.password.clone(), body.password).await?;
    if user.status != STATUS_ACTIVE {
        return Err(ApiError::Unauthorized("Account is inactive.".into()));
    }
    let tokens = state.auth.issue_pair(user.id)?;
    Ok(Envelope::ok_with_message(
        "Logged in successfully.",
        SessionResponse {
            user,
            tokens,
        },
    ))
}

async fn refresh_token(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<RefreshRequest>,
) -> ApiResult<Json<Envelope<AccessTokenResponse>>> {
    let user_id = state.auth.validate_refresh_token(body.refresh_token.trim())?;
    // Tokens of deleted users stop refreshing.
    state
        .user_service
        .get_user(user_id)
        .map_err(|_| ApiError::from(AuthError::Unauthorized))?;
    let token = state.auth.issue_access_token(user_id)?;
    Ok(Envelope::ok(AccessTokenResponse {
        token,
        expires_in: state.auth.expires_in().as_secs(),
    }))
}

async fn logout() -> Json<Envelope<Value>> {
    Envelope::ok_with_message("Logged out successfully.", json!({ "token": null }))
}

async fn me(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Envelope<User>>> {
    let user = state.user_service.get_user(caller.user_id)?;
    Ok(Envelope::ok(user))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i32>,
) -> ApiResult<Json<Envelope<UserProfile>>> {
    let profile = state.user_service.get_profile(user_id)?;
    Ok(Envelope::ok(profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<Envelope<UserProfile>>> {
    let profile = state
        .user_service
        .update_profile(caller.user_id, update)
        .await?;
    Ok(Envelope::ok_with_message(
        "Profile updated successfully.",
        profile,
    ))
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    require_password_pair(
        &body.new_password,
        &body.confirm_password,
        "New password and confirm password should be same.",
    )?;
    let password_hash = hash_password_blocking(body.new_password).await?;
    state
        .user_service
        .update_password(caller.user_id, password_hash)
        .await?;
    Ok(Envelope::message("Password updated successfully."))
}

async fn update_fcm_id(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<FcmIdRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    let fcm_id = body.fcm_id.trim();
    if fcm_id.is_empty() {
        return Err(ApiError::BadRequest("fcm_id is required".into()));
    }
    state
        .user_service
        .update_fcm_id(caller.user_id, fcm_id.to_string())
        .await?;
    Ok(Envelope::message("Fcm id updated successfully."))
}

/// Picks a file extension from the upload's name, falling back to its MIME subtype.
fn image_extension(file_name: Option<&str>, content_type: &str) -> Option<String> {
    let from_name = file_name
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str());
    let from_mime = content_type.strip_prefix("image/");
    from_name
        .or(from_mime)
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

async fn update_profile_image(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Envelope<Value>>> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PROFILE_IMAGE_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::BadRequest("Only image files are allowed.".into()));
        }
        let extension = image_extension(field.file_name(), &content_type)
            .ok_or_else(|| ApiError::BadRequest("Unsupported image type.".into()))?;
        let bytes = field.bytes().await?;
        if bytes.len() > MAX_PROFILE_IMAGE_BYTES {
            return Err(ApiError::BadRequest(
                "Image size should be less than 250 KB.".into(),
            ));
        }

        let image_name = format!(
            "{}-{}.{}",
            PROFILE_IMAGE_FIELD,
            Utc::now().timestamp_millis(),
            extension
        );
        tokio::fs::write(state.upload_dir.join(&image_name), &bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store profile image: {e}")))?;
        state
            .user_service
            .update_profile_image(caller.user_id, image_name.clone())
            .await?;
        return Ok(Envelope::ok_with_message(
            "Image uploaded successfully.",
            json!({ "image_name": image_name }),
        ));
    }
    Err(ApiError::BadRequest(format!(
        "{PROFILE_IMAGE_FIELD} is required"
    )))
}

async fn add_unavailability(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<UnavailabilityRequest>,
) -> ApiResult<Json<Envelope<Unavailability>>> {
    let window = NewUnavailability {
        user_id: caller.user_id,
        unavailability_start: parse_timestamp(&body.unavailability_start)?,
        unavailability_end: parse_timestamp(&body.unavailability_end)?,
    };
    let saved = state
        .unavailability_service
        .add_unavailability(window, Utc::now().naive_utc())
        .await?;
    Ok(Envelope::ok_with_message(
        "Unavailability added successfully.",
        saved,
    ))
}

/// Routes reachable without a token.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/refreshtoken", post(refresh_token))
        .route("/users/logout", get(logout))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/me", get(me))
        .route("/users/{id}", get(get_user))
        .route("/users/profileupdate", post(update_profile))
        .route("/users/changepassword", post(change_password))
        .route("/users/fcmid", post(update_fcm_id))
        .route("/users/profileimageupdate", post(update_profile_image))
        .route("/users/unavailability", post(add_unavailability))
}
