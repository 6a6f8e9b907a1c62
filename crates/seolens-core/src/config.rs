//! Analyzer configuration loaded from environment variables

use std::env::VarError;
use std::fmt;

use crate::error::ConfigError;

pub const DEFAULT_PAGESPEED_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
pub const DEFAULT_USER_AGENT: &str = "seo-analyzer-bot/1.0 (+https://example.com)";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Settings shared by the on-page fetcher and the PageSpeed client.
///
/// The PageSpeed key gates the external calls: without one, both strategies
/// degrade to zero placeholders and no request is made.
#[derive(Clone)]
pub struct AnalyzerConfig {
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_endpoint: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pagespeed_api_key: None,
            pagespeed_endpoint: DEFAULT_PAGESPEED_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field(
                "pagespeed_api_key",
                &self.pagespeed_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("pagespeed_endpoint", &self.pagespeed_endpoint)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Load analyzer configuration, reading a `.env` file first if present.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if a numeric setting does not parse.
pub fn load_analyzer_config() -> Result<AnalyzerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_analyzer_config(|key| std::env::var(key))
}

/// Build analyzer configuration from an env-var lookup function.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if a numeric setting does not parse.
pub fn build_analyzer_config<F>(lookup: F) -> Result<AnalyzerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // An empty key counts as unset.
    let pagespeed_api_key = lookup("GOOGLE_PAGESPEED_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    let pagespeed_endpoint = or_default("SEOLENS_PAGESPEED_ENDPOINT", DEFAULT_PAGESPEED_ENDPOINT);
    let user_agent = or_default("SEOLENS_USER_AGENT", DEFAULT_USER_AGENT);
    let request_timeout_secs = parse_u64(
        "SEOLENS_REQUEST_TIMEOUT_SECS",
        &or_default(
            "SEOLENS_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        ),
    )?;

    Ok(AnalyzerConfig {
        pagespeed_api_key,
        pagespeed_endpoint,
        user_agent,
        request_timeout_secs,
    })
}

fn parse_u64(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}
