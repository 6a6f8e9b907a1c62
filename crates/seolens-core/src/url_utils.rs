use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::AnalyzeError;

static RE_HTTP_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("invalid http prefix regex"));
static RE_SCHEME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("invalid scheme prefix regex")
});

/// Validate user input and normalize it to an absolute http(s) URL.
///
/// Input without a scheme is treated as `https://<input>`. Any other explicit
/// scheme (`ftp://`, `file://`, ...) is rejected. Errors never carry parser
/// details, only [`AnalyzeError::InvalidUrl`].
pub fn normalize_target_url(input: &str) -> Result<String, AnalyzeError> {
    let input = input.trim();

    let candidate = if RE_HTTP_PREFIX.is_match(input) {
        input.to_string()
    } else if RE_SCHEME_PREFIX.is_match(input) {
        return Err(AnalyzeError::InvalidUrl);
    } else {
        format!("https://{input}")
    };

    let parsed = Url::parse(&candidate).map_err(|_| AnalyzeError::InvalidUrl)?;
    if !parsed.scheme().starts_with("http") || parsed.host_str().is_none() {
        return Err(AnalyzeError::InvalidUrl);
    }

    Ok(parsed.to_string())
}

/// File name used when exporting a report as JSON, keyed by hostname.
pub fn export_file_name(url: &str) -> String {
    match Url::parse(url).ok().as_ref().and_then(Url::host_str) {
        Some(host) => format!("seo-report-{host}.json"),
        None => "seo-report.json".to_string(),
    }
}
