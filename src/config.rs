use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub static_root: PathBuf,
    pub default_currency: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tripplan.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let static_root = env::var("STATIC_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        let default_currency = env::var("DEFAULT_CURRENCY")
            .map(|raw| raw.trim().to_uppercase())
            .unwrap_or_else(|_| "INR".to_string());
        if default_currency.is_empty() {
            return Err(AppError::Config("DEFAULT_CURRENCY must not be empty".into()));
        }

        Ok(Self {
            database_url,
            listen_addr,
            static_root,
            default_currency,
        })
    }
}
