//! Common types used across seolens

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Result of running the on-page checklist against one HTML document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnPageReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub title_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub meta_description_length: usize,
    pub h1_count: usize,
    pub h2_count: usize,
    pub images_missing_alt: Vec<ImageRef>,
    /// Raw `href` of `link[rel="canonical"]`, `null` when the tag is absent
    pub canonical: Option<String>,
    /// Raw `content` of `meta[name="robots"]`, `null` when the tag is absent
    pub robots: Option<String>,
    pub open_graph: BTreeMap<String, String>,
    /// 0-100
    pub score: u8,
    pub recommendations: Vec<String>,
}

/// An `<img>` reference as found in the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// PageSpeed Insights device profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores and Core Web Vitals extracted from one PageSpeed run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsiResult {
    pub performance: u8,
    pub seo: u8,
    pub accessibility: u8,
    pub best_practices: u8,
    pub cwv: CoreWebVitals,
    /// Full API response, kept for the JSON export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<JsonValue>,
}

impl PsiResult {
    /// All-zero result used in place of a failed or skipped strategy
    pub fn placeholder() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreWebVitals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inp: Option<MetricValue>,
}

impl CoreWebVitals {
    pub fn is_empty(&self) -> bool {
        self.lcp.is_none() && self.cls.is_none() && self.inp.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

/// Outcome of one strategy run. Failures carry a human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    Success(PsiResult),
    Failure(String),
}

impl StrategyOutcome {
    /// SEO category score, 0 for a failed strategy
    pub fn seo(&self) -> u8 {
        match self {
            StrategyOutcome::Success(result) => result.seo,
            StrategyOutcome::Failure(_) => 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StrategyOutcome::Success(_) => None,
            StrategyOutcome::Failure(message) => Some(message),
        }
    }

    /// Unwrap into a result, substituting the zero placeholder for failures
    pub fn into_result_or_placeholder(self) -> PsiResult {
        match self {
            StrategyOutcome::Success(result) => result,
            StrategyOutcome::Failure(_) => PsiResult::placeholder(),
        }
    }
}

/// Mobile and desktop outcomes for one URL
#[derive(Debug, Clone, PartialEq)]
pub struct PsiPair {
    pub mobile: StrategyOutcome,
    pub desktop: StrategyOutcome,
}

impl PsiPair {
    /// Both strategies failed with the same message
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            mobile: StrategyOutcome::Failure(message.clone()),
            desktop: StrategyOutcome::Failure(message),
        }
    }

    /// Marker pair used when no PageSpeed key is configured
    pub fn missing() -> Self {
        Self::failed("missing")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsiScores {
    pub mobile: PsiResult,
    pub desktop: PsiResult,
}

/// Top-level analysis result returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    pub url: String,
    pub psi: PsiScores,
    pub onpage: OnPageReport,
    /// 60% PageSpeed mobile SEO + 40% on-page score
    pub seo_score: u8,
}
