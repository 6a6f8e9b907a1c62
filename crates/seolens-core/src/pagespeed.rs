//! PageSpeed Insights client
//!
//! Runs the mobile and desktop strategies as two independent tasks. Each
//! failure is folded into a [`StrategyOutcome::Failure`] so the pair always
//! resolves, no matter which side fails.

use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use tokio::task::{JoinError, JoinHandle};

use crate::error::PageSpeedError;
use crate::types::{CoreWebVitals, MetricValue, PsiPair, PsiResult, Strategy, StrategyOutcome};

/// Lighthouse categories requested from the API
pub const CATEGORIES: [&str; 4] = ["performance", "seo", "accessibility", "best-practices"];

const LCP_AUDIT: &str = "largest-contentful-paint";
const CLS_AUDIT: &str = "cumulative-layout-shift";
const INP_AUDIT: &str = "interaction-to-next-paint";
const INP_EXPERIMENTAL_AUDIT: &str = "experimental-interaction-to-next-paint";

#[derive(Clone)]
pub struct PageSpeedClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PageSpeedClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Run one strategy against the API.
    ///
    /// # Errors
    ///
    /// - [`PageSpeedError::RateLimited`] for HTTP 429.
    /// - [`PageSpeedError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`PageSpeedError::Http`] for network failures.
    /// - [`PageSpeedError::Deserialize`] when the body is not JSON.
    pub async fn fetch_strategy(
        &self,
        url: &str,
        strategy: Strategy,
    ) -> Result<PsiResult, PageSpeedError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("url", url),
            ("strategy", strategy.as_str()),
            ("key", self.api_key.as_str()),
        ];
        query.extend(CATEGORIES.iter().map(|category| ("category", *category)));

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(http_error)?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PageSpeedError::RateLimited);
        }
        if !status.is_success() {
            return Err(PageSpeedError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(http_error)?;
        let raw: JsonValue = serde_json::from_str(&body).map_err(PageSpeedError::Deserialize)?;
        tracing::debug!(url, %strategy, "pagespeed strategy completed");
        Ok(parse_lighthouse_result(raw))
    }

    /// Run both strategies concurrently. Never fails: each side resolves to
    /// its own success or failure. Dropping the future aborts both tasks.
    pub async fn fetch_both(&self, url: &str) -> PsiPair {
        let mut mobile = AbortOnDrop(self.spawn_strategy(url, Strategy::Mobile));
        let mut desktop = AbortOnDrop(self.spawn_strategy(url, Strategy::Desktop));
        let (mobile_joined, desktop_joined) = tokio::join!(&mut mobile.0, &mut desktop.0);

        PsiPair {
            mobile: settle(Strategy::Mobile, mobile_joined),
            desktop: settle(Strategy::Desktop, desktop_joined),
        }
    }

    fn spawn_strategy(
        &self,
        url: &str,
        strategy: Strategy,
    ) -> JoinHandle<Result<PsiResult, PageSpeedError>> {
        let client = self.clone();
        let url = url.to_string();
        tokio::spawn(async move { client.fetch_strategy(&url, strategy).await })
    }
}

/// Aborts the wrapped task when dropped; a no-op once it has finished.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// The request URL holds `key=<API key>`; keep it out of messages and logs.
fn http_error(error: reqwest::Error) -> PageSpeedError {
    PageSpeedError::Http(error.without_url())
}

fn settle(
    strategy: Strategy,
    joined: Result<Result<PsiResult, PageSpeedError>, JoinError>,
) -> StrategyOutcome {
    match joined {
        Ok(Ok(result)) => StrategyOutcome::Success(result),
        Ok(Err(error)) => {
            tracing::warn!(%strategy, %error, "pagespeed strategy failed");
            StrategyOutcome::Failure(error.to_string())
        }
        Err(error) => {
            tracing::warn!(%strategy, %error, "pagespeed task aborted");
            StrategyOutcome::Failure(format!("PageSpeed task failed: {error}"))
        }
    }
}

/// Extract category scores and Core Web Vitals from a raw API response.
///
/// Missing categories score 0. A metric is kept only when its audit carries a
/// numeric value (`numericValue`, falling back to `score`).
pub fn parse_lighthouse_result(raw: JsonValue) -> PsiResult {
    let lighthouse = raw.get("lighthouseResult");
    let categories = lighthouse.and_then(|lr| lr.get("categories"));
    let audits = lighthouse.and_then(|lr| lr.get("audits"));

    let category_score = |key: &str| -> u8 {
        categories
            .and_then(|c| c.get(key))
            .and_then(|c| c.get("score"))
            .and_then(JsonValue::as_f64)
            .map_or(0, scale_score)
    };

    let cwv = CoreWebVitals {
        lcp: find_audit(audits, LCP_AUDIT).and_then(metric_from_audit),
        cls: find_audit(audits, CLS_AUDIT).and_then(metric_from_audit),
        inp: find_audit(audits, INP_AUDIT)
            .or_else(|| find_audit(audits, INP_EXPERIMENTAL_AUDIT))
            .and_then(metric_from_audit),
    };

    let performance = category_score("performance");
    let seo = category_score("seo");
    let accessibility = category_score("accessibility");
    let best_practices = category_score("best-practices");

    PsiResult {
        performance,
        seo,
        accessibility,
        best_practices,
        cwv,
        raw: Some(raw),
    }
}

/// An audit entry, provided it carries a value at all
fn find_audit<'a>(audits: Option<&'a JsonValue>, key: &str) -> Option<&'a JsonValue> {
    let audit = audits?.get(key)?;
    audit_value(audit).map(|_| audit)
}

/// `numericValue`, else `score`, ignoring nulls
fn audit_value(audit: &JsonValue) -> Option<&JsonValue> {
    audit
        .get("numericValue")
        .filter(|value| !value.is_null())
        .or_else(|| audit.get("score").filter(|value| !value.is_null()))
}

fn metric_from_audit(audit: &JsonValue) -> Option<MetricValue> {
    let value = audit_value(audit)?.as_f64()?;
    Some(MetricValue {
        value,
        display_value: audit
            .get("displayValue")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
    })
}

/// Scale a 0-1 Lighthouse fraction to 0-100
fn scale_score(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}
