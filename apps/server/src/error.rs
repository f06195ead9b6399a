use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pairgoal_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

/// Status used for duplicates and pairing conflicts.
pub const CONFLICT_STATUS: StatusCode = StatusCode::METHOD_NOT_ALLOWED;

const INTERNAL_MESSAGE: &str = "Something went wrong, please try again later.";

/// Body shape shared by every response: `{status, message?, result?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(result: T) -> Json<Self> {
        Json(Self {
            status: StatusCode::OK.as_u16(),
            message: None,
            result: Some(result),
        })
    }

    pub fn ok_with_message(message: impl Into<String>, result: T) -> Json<Self> {
        Json(Self {
            status: StatusCode::OK.as_u16(),
            message: Some(message.into()),
            result: Some(result),
        })
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: StatusCode::OK.as_u16(),
            message: Some(message.into()),
            result: None,
        })
    }
}

/// Builds an error response whose HTTP status matches the envelope status.
pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(Envelope::<()> {
        status: status.as_u16(),
        message: Some(message.into()),
        result: None,
    });
    (status, body).into_response()
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => core_status(e),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) | ApiError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::ConstraintViolation(_) => CONFLICT_STATUS,
        CoreError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
        CoreError::Database(DatabaseError::UniqueViolation(_)) => CONFLICT_STATUS,
        CoreError::DataIntegrity(_) | CoreError::Database(_) | CoreError::Unexpected(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("request failed: {self}");
            INTERNAL_MESSAGE.to_string()
        } else {
            match &self {
                ApiError::Core(CoreError::Validation(e)) => e.to_string(),
                ApiError::Core(CoreError::ConstraintViolation(msg)) => msg.clone(),
                other => other.to_string(),
            }
        };
        failure(status, message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

/// JSON body extractor whose rejections use the envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
