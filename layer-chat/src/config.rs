//! Run configuration, read from the environment.
//!
//! | Variable            | Required | Default |
//! |---------------------|----------|---------|
//! | `API_ID`            | yes      |         |
//! | `API_HASH`          | yes      |         |
//! | `TEST_PHONE_NUMBER` | yes      |         |
//! | `TFA_PASSWORD`      | no       | prompt  |
//! | `DIALOG_LIMIT`      | no       | 50      |
//! | `HISTORY_LIMIT`     | no       | 20      |

use std::{env, fmt};

use crate::errors::ConfigError;

pub const DEFAULT_DIALOG_LIMIT:  i32 = 50;
pub const DEFAULT_HISTORY_LIMIT: i32 = 20;
/// Largest page Telegram serves for `messages.getDialogs` / `messages.getHistory`.
pub const MAX_LIMIT: i32 = 100;

#[derive(Clone)]
pub struct Config {
    pub api_id:        i32,
    pub api_hash:      String,
    pub phone:         String,
    /// Two-factor password. Asked for interactively when `None`.
    pub password:      Option<String>,
    pub dialog_limit:  i32,
    pub history_limit: i32,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_id = required(&lookup, "API_ID")?
            .parse::<i32>()
            .map_err(|_| ConfigError::new("API_ID", "not a number"))?;
        if api_id <= 0 {
            return Err(ConfigError::new("API_ID", "must be positive"));
        }

        Ok(Self {
            api_id,
            api_hash:      required(&lookup, "API_HASH")?,
            phone:         required(&lookup, "TEST_PHONE_NUMBER")?,
            password:      optional(&lookup, "TFA_PASSWORD"),
            dialog_limit:  limit(&lookup, "DIALOG_LIMIT", DEFAULT_DIALOG_LIMIT)?,
            history_limit: limit(&lookup, "HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .field("phone", &self.phone)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("dialog_limit", &self.dialog_limit)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<String, ConfigError> {
    optional(lookup, var).ok_or_else(|| ConfigError::new(var, "not set"))
}

fn limit(
    lookup:  &impl Fn(&str) -> Option<String>,
    var:     &'static str,
    default: i32,
) -> Result<i32, ConfigError> {
    let Some(raw) = optional(lookup, var) else { return Ok(default) };
    let n = raw.parse::<i32>().map_err(|_| ConfigError::new(var, "not a number"))?;
    if !(1..=MAX_LIMIT).contains(&n) {
        return Err(ConfigError::new(var, format!("must be between 1 and {MAX_LIMIT}")));
    }
    Ok(n)
}
