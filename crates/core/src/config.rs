use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OtliteError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub otlp_http_addr: String,
    pub max_body_bytes: usize,
    pub ingest_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let data_root = env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(home).join(".local/share"));

        Self {
            db_path: data_root.join("otlite/otlite.db"),
            otlp_http_addr: "127.0.0.1:4318".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
            ingest_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let mut cfg = Self::default();
        let file_overrides = load_file_overrides(path)?.ok_or_else(|| {
            OtliteError::Config(format!("config file not found: {}", path.display()))
        })?;
        apply_overrides(&mut cfg, file_overrides, "config file")?;
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    db_path: Option<PathBuf>,
    otlp_http_addr: Option<String>,
    max_body_bytes: Option<usize>,
    ingest_timeout: Option<String>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("OTLITE_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("otlite/config.toml")
}

fn load_file_overrides(path: &PathBuf) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| OtliteError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| OtliteError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> Result<ConfigOverrides> {
    let max_body_bytes = match env::var("OTLITE_MAX_BODY_BYTES") {
        Ok(v) => Some(v.parse::<usize>().map_err(|e| {
            OtliteError::Config(format!("bad OTLITE_MAX_BODY_BYTES in environment: {e}"))
        })?),
        Err(_) => None,
    };

    Ok(ConfigOverrides {
        db_path: env::var("OTLITE_DB_PATH").ok().map(PathBuf::from),
        otlp_http_addr: env::var("OTLITE_OTLP_HTTP_ADDR").ok(),
        max_body_bytes,
        ingest_timeout: env::var("OTLITE_INGEST_TIMEOUT").ok(),
    })
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.db_path {
        cfg.db_path = v;
    }
    if let Some(v) = overrides.otlp_http_addr {
        cfg.otlp_http_addr = v;
    }
    if let Some(v) = overrides.max_body_bytes {
        cfg.max_body_bytes = v;
    }
    if let Some(v) = overrides.ingest_timeout {
        cfg.ingest_timeout = humantime::parse_duration(&v).map_err(|e| {
            OtliteError::Config(format!("bad ingest_timeout in {source}: {e} (value={v})"))
        })?;
    }
    Ok(())
}
