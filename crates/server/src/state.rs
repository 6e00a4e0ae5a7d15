use crate::config::{Config, ConfigError};
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared by every handler; cloning is cheap
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub key: Key,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Result<Self, ConfigError> {
        let key = Key::try_from(config.secret_key.as_bytes())
            .map_err(|_| ConfigError::SecretTooShort)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            key,
            http: reqwest::Client::new(),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}
