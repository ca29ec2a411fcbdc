use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use url::Url;

use crate::db::DEFAULT_MAX_POOL_SIZE;

/// Used when `NOTIFY_RECIPIENTS` is unset or empty.
///
/// Only the HR mailbox is a known address; the `dp@` and `gerencia@`
/// entries are placeholders that deployments override.
pub const DEFAULT_NOTIFY_RECIPIENTS: [&str; 3] = [
    "rh@omegadistribuidora.com.br",
    "dp@omegadistribuidora.com.br",
    "gerencia@omegadistribuidora.com.br",
];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_pool_size: u32,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_minutes: i64,
    pub cors_allowed_origin: Option<String>,
    pub template_dir: PathBuf,
    pub mail_from: Option<String>,
    pub notify_recipients: Vec<String>,
    pub aws_endpoint_url: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_pool_size = env::var("DATABASE_MAX_POOL_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_POOL_SIZE);
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("SERVER_PORT must be a valid u16")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "rh-backend".to_string());
        let jwt_audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "rh-admin".to_string());
        let jwt_expiry_minutes = env::var("JWT_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "480".to_string())
            .parse()
            .context("JWT_EXPIRY_MINUTES must be an integer")?;
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN").ok();
        let template_dir = env::var("TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("templates"));
        let mail_from = env::var("MAIL_FROM")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let notify_recipients = parse_recipients(env::var("NOTIFY_RECIPIENTS").ok().as_deref());
        let aws_endpoint_url = env::var("AWS_ENDPOINT_URL").ok();
        let aws_access_key_id = env::var("AWS_ACCESS_KEY_ID").ok();
        let aws_secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok();
        let aws_region = env::var("AWS_REGION").unwrap_or_else(|_| "sa-east-1".to_string());

        Ok(Self {
            database_url,
            database_max_pool_size,
            server_host,
            server_port,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            jwt_expiry_minutes,
            cors_allowed_origin,
            template_dir,
            mail_from,
            notify_recipients,
            aws_endpoint_url,
            aws_access_key_id,
            aws_secret_access_key,
            aws_region,
        })
    }

    pub fn redacted_database_url(&self) -> String {
        redact_database_url(&self.database_url)
    }
}

/// Comma-separated list; blanks are dropped and an empty result falls back
/// to [`DEFAULT_NOTIFY_RECIPIENTS`].
pub fn parse_recipients(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();

    if parsed.is_empty() {
        DEFAULT_NOTIFY_RECIPIENTS
            .iter()
            .map(|value| value.to_string())
            .collect()
    } else {
        parsed
    }
}

fn redact_database_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut parsed) => {
            let _ = parsed.set_password(Some("*****"));
            parsed.to_string()
        }
        Err(_) => "***".to_string(),
    }
}
