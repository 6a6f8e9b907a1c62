use thiserror::Error;

/// Failures that abort an analysis request.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Deliberately generic: parser details are not exposed to callers.
    #[error("Invalid URL")]
    InvalidUrl,

    #[error("{0:#}")]
    Fetch(anyhow::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failures of a single PageSpeed Insights strategy call.
#[derive(Debug, Error)]
pub enum PageSpeedError {
    #[error("Rate limit exceeded for PageSpeed API")]
    RateLimited,

    #[error("PageSpeed API error: {status}")]
    UnexpectedStatus { status: u16 },

    /// Built with the request URL stripped, since it carries the API key.
    #[error("PageSpeed API request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("PageSpeed API returned invalid JSON: {0}")]
    Deserialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
