//! Utility functions and helpers

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::shared::errors::SwapError;

pub const CONFIG_DIR_NAME: &str = ".occ";
pub const SETTINGS_FILE: &str = ".env";
pub const SECRET_STAGING_FILE: &str = ".env.temp";
pub const TOKENS_FILE: &str = "tokens.json";
pub const WALLETS_FILE: &str = "wallets.json";

/// Resolve the per-user configuration directory: explicit override, else `~/.occ`.
pub fn config_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, SwapError> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or_else(|| SwapError::Config("could not determine home directory".to_string()))
}

/// Current wall-clock time in epoch seconds
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

/// ISO-8601 timestamp with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format epoch seconds as ISO-8601; falls back to the raw number when out of range.
pub fn format_epoch(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| seconds.to_string())
}

/// Keep the first and last four characters of a secret.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Settings keys whose values must not be printed in full.
pub fn is_secret_key(key: &str) -> bool {
    let upper = key.to_uppercase();
    upper.ends_with("_PRIVATE_KEY") || upper == "OCC_API_KEY"
}
