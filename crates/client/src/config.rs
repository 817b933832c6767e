//! Reporter configuration.
//!
//! The library never reads the environment on its own; [`ReporterConfig::from_env`]
//! is provided for binaries such as the CLI.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TENCENT_ADS_ACCESS_TOKEN` - Attribution API access token (required at send time)
//! - `TENCENT_ADS_ACCOUNT_ID` - Advertiser account id (click-id reports only)
//! - `TENCENT_ADS_ACTION_SET_ID` - User action set id (click-id reports only)
//! - `TENCENT_ADS_CALLBACK_ENDPOINT` - Override for the callback endpoint URL
//! - `TENCENT_ADS_CLICK_ID_ENDPOINT` - Override for the click-id endpoint URL

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Endpoint for callback-token reports.
pub const CALLBACK_ENDPOINT: &str = "https://api.e.qq.com/v3.0/user_actions/add";

/// Endpoint for click-id reports.
pub const CLICK_ID_ENDPOINT: &str = "https://api.e.qq.com/v1.1/user_actions/add";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Attribution API endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Target for reports keyed by a callback token.
    pub callback: Url,
    /// Target for reports keyed by a click id.
    pub click_id: Url,
}

impl Endpoints {
    /// Point both endpoints at a different base, keeping the platform's paths.
    ///
    /// Useful for proxies and local stubs.
    ///
    /// # Errors
    ///
    /// Returns error if `base` is not a valid absolute URL.
    pub fn with_base(base: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base)?;
        Ok(Self {
            callback: base.join("v3.0/user_actions/add")?,
            click_id: base.join("v1.1/user_actions/add")?,
        })
    }
}

impl Default for Endpoints {
    // Both constants are absolute URLs; `test_default_endpoints` parses them.
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            callback: Url::parse(CALLBACK_ENDPOINT).expect("valid callback endpoint"),
            click_id: Url::parse(CLICK_ID_ENDPOINT).expect("valid click-id endpoint"),
        }
    }
}

/// Reporter configuration.
///
/// Nothing is validated here; missing values surface when a report is sent.
/// Implements `Debug` manually to redact the access token.
#[derive(Clone, Default)]
pub struct ReporterConfig {
    /// Attribution API access token.
    pub access_token: Option<SecretString>,
    /// Advertiser account id.
    pub account_id: Option<String>,
    /// User action set id.
    pub action_set_id: Option<String>,
    /// API endpoints.
    pub endpoints: Endpoints,
}

impl std::fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("account_id", &self.account_id)
            .field("action_set_id", &self.action_set_id)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl ReporterConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an endpoint override is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an endpoint override is not a valid URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let mut endpoints = Endpoints::default();
        if let Some(callback) = get("TENCENT_ADS_CALLBACK_ENDPOINT") {
            endpoints.callback = parse_url("TENCENT_ADS_CALLBACK_ENDPOINT", &callback)?;
        }
        if let Some(click_id) = get("TENCENT_ADS_CLICK_ID_ENDPOINT") {
            endpoints.click_id = parse_url("TENCENT_ADS_CLICK_ID_ENDPOINT", &click_id)?;
        }

        Ok(Self {
            access_token: get("TENCENT_ADS_ACCESS_TOKEN").map(SecretString::from),
            account_id: get("TENCENT_ADS_ACCOUNT_ID"),
            action_set_id: get("TENCENT_ADS_ACTION_SET_ID"),
            endpoints,
        })
    }

    /// The access token, if one is set and non-empty.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_ref()
            .map(|token| token.expose_secret())
            .filter(|token| !token.is_empty())
    }

    /// The account id, if set and non-empty.
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        non_empty(self.account_id.as_deref())
    }

    /// The action set id, if set and non-empty.
    #[must_use]
    pub fn action_set_id(&self) -> Option<&str> {
        non_empty(self.action_set_id.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
