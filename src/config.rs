use std::path::PathBuf;

use crate::errors::ServerError;
use crate::summarizer::{DEFAULT_API_BASE, DEFAULT_MODEL};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Runtime settings, read from the environment (and `.env`) once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub allowed_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub rate_limit_replenish_ms: u64,
    pub rate_limit_burst: u32,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| ServerError::EnvironmentError("DATABASE_URL is not set".to_string()))?;

        Ok(Config {
            database_url,
            port: parse_or(var("PORT"), "PORT", DEFAULT_PORT)?,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: var("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            allowed_origins: var("ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            upload_dir: var("UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
            rate_limit_replenish_ms: parse_or(
                var("RATE_LIMIT_REPLENISH_MS"),
                "RATE_LIMIT_REPLENISH_MS",
                500,
            )?,
            rate_limit_burst: parse_or(var("RATE_LIMIT_BURST"), "RATE_LIMIT_BURST", 120)?,
            environment: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &str,
    default: T,
) -> Result<T, ServerError> {
    match value {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|_| ServerError::EnvironmentError(format!("{key} must be a positive integer"))),
        None => Ok(default),
    }
}
