use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use rand::RngCore;

use crate::auth::decode_secret_key;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub upload_dir: PathBuf,
    pub jwt_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("PG_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid PG_LISTEN_ADDR")?;
        let db_path = std::env::var("PG_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("PG_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms = env_u64("PG_REQUEST_TIMEOUT_MS", 30_000);
        let upload_dir = std::env::var("PG_UPLOAD_DIR")
            .unwrap_or_else(|_| "./public/profile_images".into())
            .into();
        let jwt_secret = secret_from_env("PG_JWT_SECRET")?;
        let refresh_secret = secret_from_env("PG_REFRESH_SECRET")?;
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            upload_dir,
            jwt_secret,
            refresh_secret,
            access_token_ttl: Duration::from_secs(env_u64("PG_ACCESS_TOKEN_TTL_SECS", 900)),
            refresh_token_ttl: Duration::from_secs(env_u64("PG_REFRESH_TOKEN_TTL_SECS", 86_400)),
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

/// Reads a signing secret, generating a process-local one when unset.
///
/// Tokens signed with a generated secret do not survive a restart.
fn secret_from_env(key: &str) -> anyhow::Result<Vec<u8>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            decode_secret_key(&raw).with_context(|| format!("Invalid {key}"))
        }
        _ => {
            tracing::warn!("{key} not set; using a random secret for this process");
            Ok(random_secret())
        }
    }
}

pub fn random_secret() -> Vec<u8> {
    let mut secret = vec![0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}
