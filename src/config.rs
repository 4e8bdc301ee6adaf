use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use url::Url;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_dir: PathBuf,
    pub gemini_api_key: String,
    pub gemini_api_base: Url,
    pub gemini_request_timeout_secs: u64,
    pub style_catalog_path: PathBuf,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// `Url::join` drops the last path segment unless the base ends with a slash.
fn normalize_api_base(value: &str) -> Result<Url> {
    let trimmed = value.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).with_context(|| format!("GEMINI_API_BASE is not a valid URL: {value}"))
}

fn resolve_catalog_path() -> PathBuf {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(env_value) = env::var("STYLE_CATALOG_PATH") {
        let env_path = PathBuf::from(env_value);
        if env_path.is_absolute() {
            candidates.push(env_path);
        } else {
            candidates.push(
                env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(env_path),
            );
        }
    }
    candidates.push(PathBuf::from("catalog.json"));
    candidates.push(PathBuf::from("data").join("catalog.json"));

    for candidate in &candidates {
        if candidate.exists() {
            return candidate.to_path_buf();
        }
    }

    candidates
        .first()
        .cloned()
        .unwrap_or_else(|| PathBuf::from("catalog.json"))
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            log_dir: PathBuf::from(env_string("LOG_DIR", "logs")),
            gemini_api_key: env_string("GEMINI_API_KEY", "").trim().to_string(),
            gemini_api_base: normalize_api_base(&env_string(
                "GEMINI_API_BASE",
                DEFAULT_GEMINI_API_BASE,
            ))?,
            gemini_request_timeout_secs: env_u64("GEMINI_REQUEST_TIMEOUT_SECS", 120),
            style_catalog_path: resolve_catalog_path(),
        })
    }
}
