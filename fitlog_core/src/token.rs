//! OAuth token file for the activity API.
//!
//! The file is a JSON object with `access_token`, `refresh_token` and
//! `expires_at` (UNIX seconds). Any other keys are carried through untouched.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenSet {
    /// Load tokens from a file with shared locking
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let tokens = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded tokens from {:?}", path);
        Ok(tokens)
    }

    /// Save tokens pretty-printed, atomically replacing the file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        crate::output::write_atomic(path, contents.as_bytes())?;
        tracing::debug!("Saved tokens to {:?}", path);
        Ok(())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.expires_at
    }

    /// Overwrite fields with every key of a refresh response
    pub fn apply_refresh(&mut self, response: Map<String, Value>) -> Result<()> {
        for (key, value) in response {
            match key.as_str() {
                "access_token" => self.access_token = string_field(&key, value)?,
                "refresh_token" => self.refresh_token = string_field(&key, value)?,
                "expires_at" => {
                    self.expires_at = value.as_i64().ok_or_else(|| {
                        Error::Config(format!("refresh response expires_at is not an integer: {value}"))
                    })?
                }
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
        Ok(())
    }
}

fn string_field(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::Config(format!(
            "refresh response {key} is not a string: {other}"
        ))),
    }
}

/// Read the token file, refreshing and rewriting it when expired
///
/// `refresh` performs the token exchange and returns the raw response object.
pub fn read_tokens<F>(path: &Path, now: DateTime<Utc>, refresh: F) -> Result<TokenSet>
where
    F: FnOnce(&TokenSet) -> Result<Map<String, Value>>,
{
    let mut tokens = TokenSet::load(path)?;

    if tokens.is_expired(now) {
        tracing::info!("Access token expired at {}, refreshing", tokens.expires_at);
        let response = refresh(&tokens)?;
        tokens.apply_refresh(response)?;
        tokens.save(path)?;
    }

    Ok(tokens)
}
