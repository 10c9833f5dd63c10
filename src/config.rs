use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::data::odds_api::DEFAULT_BASE_URL;
use crate::odds::types::PricingMode;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub odds_api: OddsApiConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub run_once: bool,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// IANA zone used for kickoff times, e.g. "America/Chicago".
    #[serde(default)]
    pub display_timezone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_sports")]
    pub sports: Vec<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_active_sports_ttl")]
    pub active_sports_ttl_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub mode: PricingMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Append rendered messages here instead of stdout.
    #[serde(default)]
    pub outbox_path: Option<String>,
    /// Overwrite with the latest formatted odds as JSON.
    #[serde(default)]
    pub summary_path: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            run_once: false,
            poll_interval_secs: default_poll_interval(),
            display_timezone: None,
        }
    }
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            region: default_region(),
            sports: default_sports(),
            request_timeout_secs: default_request_timeout(),
            active_sports_ttl_secs: default_active_sports_ttl(),
        }
    }
}

fn default_poll_interval() -> u64 { 21600 }
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_region() -> String { "us".to_string() } // only bet on USA
fn default_sports() -> Vec<String> { vec!["americanfootball_nfl".to_string()] }
fn default_request_timeout() -> u64 { 30 }
fn default_active_sports_ttl() -> u64 { 3600 }

impl Config {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            warn!("Config file {} not found, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Zone used to display kickoff times: the configured zone, else `TZ`,
    /// else UTC.
    pub fn display_timezone(&self) -> Result<Tz> {
        resolve_timezone(
            self.system.display_timezone.as_deref(),
            std::env::var("TZ").ok().as_deref(),
        )
    }
}

fn resolve_timezone(configured: Option<&str>, env_tz: Option<&str>) -> Result<Tz> {
    if let Some(name) = configured {
        return Tz::from_str(name.trim())
            .map_err(|e| anyhow::anyhow!("Invalid display_timezone {:?}: {}", name, e));
    }

    // TZ values like ":/etc/localtime" are not IANA names; fall back quietly
    Ok(env_tz
        .map(|tz| tz.trim_start_matches(':'))
        .and_then(|tz| Tz::from_str(tz).ok())
        .unwrap_or(Tz::UTC))
}

/// API keys for the odds feed and the messaging provider.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub odds_api_key: String,
    #[serde(default)]
    pub twilio_sid: Option<String>,
    #[serde(default)]
    pub twilio_auth_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("odds_api_key", &"***")
            .field("twilio_sid", &self.twilio_sid.as_ref().map(|_| "***"))
            .field("twilio_auth_key", &self.twilio_auth_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    /// Load credentials from `CREDENTIALS_FILE` (default `credentials.toml`),
    /// letting `ODDS_API_KEY`, `TWILIO_SID` and `TWILIO_AUTH_KEY` override it.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let path = std::env::var("CREDENTIALS_FILE")
            .unwrap_or_else(|_| "credentials.toml".to_string());

        let file = if Path::new(&path).exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read credentials file: {}", path))?;
            Self::parse(&contents)
                .with_context(|| format!("Failed to parse credentials file: {}", path))?
        } else {
            Self::default()
        };

        file.with_overrides(|name| std::env::var(name).ok()).validate()
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Replace fields with non-empty values from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("ODDS_API_KEY") {
            self.odds_api_key = key;
        }
        if let Some(sid) = non_empty("TWILIO_SID") {
            self.twilio_sid = Some(sid);
        }
        if let Some(auth) = non_empty("TWILIO_AUTH_KEY") {
            self.twilio_auth_key = Some(auth);
        }
        self
    }

    pub fn validate(self) -> Result<Self> {
        if self.odds_api_key.trim().is_empty() {
            anyhow::bail!("odds_api_key not set (credentials file or ODDS_API_KEY)");
        }
        Ok(self)
    }

    pub fn has_messaging(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
        present(&self.twilio_sid) && present(&self.twilio_auth_key)
    }
}
