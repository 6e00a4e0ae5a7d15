use chrono::Duration;
use database::services::auth::SessionPolicy;
use models::validation::normalize_email;
use std::{net::SocketAddr, str::FromStr};
use thiserror::Error;
use url::Url;

/// Minimum length of `SECRET_KEY`, the size the cookie key derivation needs
pub const MIN_SECRET_LEN: usize = 64;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
    #[error("SECRET_KEY must be at least 64 bytes long")]
    SecretTooShort,
    #[error("OAuth is partially configured, {0} is missing")]
    PartialOAuth(&'static str),
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: Url,
    pub token_url: Url,
    pub userinfo_url: Url,
    pub redirect_url: Url,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub bind_address: SocketAddr,
    pub session: SessionPolicy,
    pub otp_ttl: Duration,
    pub run_migrations: bool,
    pub secure_cookies: bool,
    pub oauth: Option<OAuthConfig>,
    /// Accounts promoted to admin when they sign in
    pub admin_emails: Vec<String>,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let secret_key = get("SECRET_KEY").ok_or(ConfigError::Missing("SECRET_KEY"))?;
        if secret_key.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort);
        }

        let session = SessionPolicy {
            ttl: Duration::hours(parse_or(&get, "SESSION_TTL_HOURS", 168)?),
            refresh_after: Duration::minutes(parse_or(&get, "SESSION_REFRESH_MINUTES", 60)?),
        };

        Ok(Self {
            database_url,
            secret_key,
            bind_address: parse_or(&get, "BIND_ADDRESS", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            session,
            otp_ttl: Duration::minutes(parse_or(&get, "OTP_TTL_MINUTES", 60)?),
            run_migrations: parse_or(&get, "RUN_MIGRATIONS", true)?,
            secure_cookies: parse_or(&get, "SECURE_COOKIES", false)?,
            oauth: oauth_config(&get)?,
            admin_emails: admin_emails(get("ADMIN_EMAILS"))?,
        })
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

/// Comma-separated list, normalized like account emails
fn admin_emails(value: Option<String>) -> Result<Vec<String>, ConfigError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    let mut emails = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let email = normalize_email(entry).map_err(|_| ConfigError::Invalid {
            name: "ADMIN_EMAILS",
            value: entry.to_string(),
        })?;
        if !emails.contains(&email) {
            emails.push(email);
        }
    }
    Ok(emails)
}

/// OAuth is all or nothing: either every variable is set or none is
fn oauth_config<G>(get: &G) -> Result<Option<OAuthConfig>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    const VARS: [&str; 6] = [
        "OAUTH_CLIENT_ID",
        "OAUTH_CLIENT_SECRET",
        "OAUTH_AUTHORIZE_URL",
        "OAUTH_TOKEN_URL",
        "OAUTH_USERINFO_URL",
        "OAUTH_REDIRECT_URL",
    ];

    if VARS.iter().all(|name| get(name).is_none()) {
        return Ok(None);
    }
    if let Some(missing) = VARS.iter().find(|name| get(name).is_none()) {
        return Err(ConfigError::PartialOAuth(*missing));
    }

    let url = |name: &'static str| -> Result<Url, ConfigError> {
        let value = get(name).unwrap_or_default();
        Url::parse(&value).map_err(|_| ConfigError::Invalid { name, value })
    };

    Ok(Some(OAuthConfig {
        client_id: get("OAUTH_CLIENT_ID").unwrap_or_default(),
        client_secret: get("OAUTH_CLIENT_SECRET").unwrap_or_default(),
        authorize_url: url("OAUTH_AUTHORIZE_URL")?,
        token_url: url("OAUTH_TOKEN_URL")?,
        userinfo_url: url("OAUTH_USERINFO_URL")?,
        redirect_url: url("OAUTH_REDIRECT_URL")?,
    }))
}
