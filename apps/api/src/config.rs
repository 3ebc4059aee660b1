use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::store::ids::IdMode;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_MAX_SESSIONS: usize = 1024;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub max_sessions: usize,
    /// Sessions untouched for this long are dropped to make room for new ones.
    pub session_idle_ttl: Duration,
    pub infographic_path: PathBuf,
    pub infographic_section: String,
    pub artifact_ids: IdMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            max_sessions: parse_env("MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?,
            session_idle_ttl: Duration::from_secs(parse_env(
                "SESSION_IDLE_SECS",
                DEFAULT_SESSION_IDLE_SECS,
            )?),
            infographic_path: std::env::var("INFOGRAPHIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("Infograph.jpg")),
            infographic_section: std::env::var("INFOGRAPHIC_SECTION")
                .unwrap_or_else(|_| "competencies".to_string()),
            artifact_ids: match std::env::var("ARTIFACT_IDS") {
                Ok(raw) => parse_id_mode(&raw)?,
                Err(_) => IdMode::Random,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            infographic_path: PathBuf::from("Infograph.jpg"),
            infographic_section: "competencies".to_string(),
            artifact_ids: IdMode::Random,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_id_mode(raw: &str) -> Result<IdMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "random" => Ok(IdMode::Random),
        "sequential" => Ok(IdMode::Sequential),
        other => bail!("ARTIFACT_IDS must be 'random' or 'sequential', got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_mode_accepts_known_values() {
        assert_eq!(parse_id_mode("random").unwrap(), IdMode::Random);
        assert_eq!(parse_id_mode(" Sequential ").unwrap(), IdMode::Sequential);
    }

    #[test]
    fn test_parse_id_mode_rejects_unknown() {
        let err = parse_id_mode("timestamp").unwrap_err();
        assert!(err.to_string().contains("ARTIFACT_IDS"));
    }

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let port: u16 = parse_env("NAVIGATOR_TEST_UNSET_PORT", 9090).unwrap();
        assert_eq!(port, 9090);
    }
}
