use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::{failure, ApiError};
use crate::main_lib::AppState;

const ACCESS_TOKEN_TYPE: &str = "access";
const REFRESH_TOKEN_TYPE: &str = "refresh";

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

/// Signs and verifies access and refresh tokens, each kind with its own secret.
pub struct AuthManager {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    InvalidCredentials,
    Internal(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    typ: String,
    jti: String,
    exp: usize,
    iat: usize,
}

/// The verified caller, inserted into request extensions by [`require_jwt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            access_encoding: EncodingKey::from_secret(&config.jwt_secret),
            access_decoding: DecodingKey::from_secret(&config.jwt_secret),
            refresh_encoding: EncodingKey::from_secret(&config.refresh_secret),
            refresh_decoding: DecodingKey::from_secret(&config.refresh_secret),
            validation,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    pub fn issue_access_token(&self, user_id: i32) -> Result<String, AuthError> {
        self.sign(user_id, ACCESS_TOKEN_TYPE, self.access_ttl, &self.access_encoding)
    }

    pub fn issue_refresh_token(&self, user_id: i32) -> Result<String, AuthError> {
        self.sign(
            user_id,
            REFRESH_TOKEN_TYPE,
            self.refresh_ttl,
            &self.refresh_encoding,
        )
    }

    pub fn issue_pair(&self, user_id: i32) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            token: self.issue_access_token(user_id)?,
            refresh_token: self.issue_refresh_token(user_id)?,
            expires_in: self.access_ttl.as_secs(),
        })
    }

    /// Returns the user id carried by a valid access token.
    pub fn validate_access_token(&self, token: &str) -> Result<i32, AuthError> {
        self.verify(token, ACCESS_TOKEN_TYPE, &self.access_decoding)
    }

    /// Returns the user id carried by a valid refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<i32, AuthError> {
        self.verify(token, REFRESH_TOKEN_TYPE, &self.refresh_decoding)
    }

    pub fn expires_in(&self) -> Duration {
        self.access_ttl
    }

    fn sign(
        &self,
        user_id: i32,
        typ: &str,
        ttl: Duration,
        key: &EncodingKey,
    ) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            typ: typ.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    fn verify(&self, token: &str, typ: &str, key: &DecodingKey) -> Result<i32, AuthError> {
        let data = decode::<Claims>(token, key, &self.validation).map_err(|err| {
            match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_) => AuthError::Unauthorized,
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            }
        })?;
        if data.claims.typ != typ {
            return Err(AuthError::Unauthorized);
        }
        data.claims
            .sub
            .parse()
            .map_err(|_| AuthError::Unauthorized)
    }
}

/// Hashes a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {e}")))
}

pub fn verify_password(password_hash: &str, candidate: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {e}")))?;
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => AuthError::InvalidCredentials,
            other => AuthError::Internal(format!("Password verification failed: {other}")),
        })
}

/// Runs the hash on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("Hashing task failed: {e}")))?
}

pub async fn verify_password_blocking(
    password_hash: String,
    candidate: String,
) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password_hash, &candidate))
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {e}")))?
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::InvalidCredentials => {
                failure(StatusCode::UNAUTHORIZED, "Invalid email or password.")
            }
            AuthError::Internal(msg) => {
                tracing::error!("auth failure: {msg}");
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => ApiError::Unauthorized("Unauthorized".into()),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password.".into())
            }
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }

    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(&request).ok_or(AuthError::Unauthorized)?;
    let user_id = state.auth.validate_access_token(token)?;
    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(access_ttl: Duration) -> AuthManager {
        AuthManager::new(&AuthConfig {
            jwt_secret: vec![7u8; 32],
            refresh_secret: vec![9u8; 32],
            access_token_ttl: access_ttl,
            refresh_token_ttl: Duration::from_secs(3600),
        })
    }

    #[test]
    fn access_token_round_trips_user_id() {
        let auth = manager(Duration::from_secs(60));
        let token = auth.issue_access_token(42).unwrap();
        assert_eq!(auth.validate_access_token(&token).unwrap(), 42);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let auth = manager(Duration::from_secs(60));
        let pair = auth.issue_pair(5).unwrap();

        assert!(matches!(
            auth.validate_access_token(&pair.refresh_token),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            auth.validate_refresh_token(&pair.token),
            Err(AuthError::Unauthorized)
        ));
        assert_eq!(auth.validate_refresh_token(&pair.refresh_token).unwrap(), 5);
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = manager(Duration::from_secs(0));
        let token = auth.issue_access_token(1).unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        assert!(matches!(
            auth.validate_access_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let auth = manager(Duration::from_secs(60));
        let a = auth.issue_refresh_token(1).unwrap();
        let b = auth.issue_refresh_token(1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(verify_password(&hash, "s3cret-pass").is_ok());
        assert!(matches!(
            verify_password(&hash, "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn secret_key_accepts_base64_or_raw_ascii() {
        let raw = "this-is-a-32-byte-ascii-secret!!";
        assert_eq!(decode_secret_key(raw).unwrap(), raw.as_bytes());
        let encoded = BASE64.encode([1u8; 32]);
        assert_eq!(decode_secret_key(&encoded).unwrap(), vec![1u8; 32]);
        assert!(decode_secret_key("short").is_err());
    }
}
