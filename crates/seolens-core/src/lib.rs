//! # seolens-core
//!
//! Core library for scoring the search-engine readiness of a web page.
//!
//! This library provides:
//! - URL normalization and validation
//! - On-page checks over the fetched HTML (title, description, headings,
//!   image alt text, canonical, robots, Open Graph)
//! - Google PageSpeed Insights scores for the mobile and desktop strategies
//! - A blended 0-100 SEO score and a markdown report
//!
//! ## Example
//!
//! ```no_run
//! use seolens_core::{Analyzer, load_analyzer_config};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = load_analyzer_config()?;
//! let analyzer = Analyzer::new(&config)?;
//!
//! let result = analyzer.analyze("example.com").await?;
//! println!("{}", seolens_core::report::render_markdown(&result));
//! # Ok(())
//! # }
//! ```

pub mod analyze;
pub mod config;
pub mod error;
pub mod onpage;
pub mod pagespeed;
pub mod parser;
pub mod report;
pub mod types;
pub mod url_utils;

// Re-export commonly used types
pub use types::{
    AnalyzeResult, CoreWebVitals, ImageRef, MetricValue, OnPageReport, PsiResult, PsiScores,
    Strategy,
};

pub use analyze::Analyzer;
pub use config::{AnalyzerConfig, build_analyzer_config, load_analyzer_config};
pub use error::{AnalyzeError, ConfigError, PageSpeedError};
pub use url_utils::{export_file_name, normalize_target_url};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_end_to_end_without_network() {
        let url = normalize_target_url("example.com").unwrap();
        let onpage = onpage::analyze_html(
            r#"<html><head><title>Example Domain Page</title></head><body><h1>Hi</h1></body></html>"#,
        );
        let result = analyze::compose_result(url, types::PsiPair::missing(), onpage);

        assert_eq!(result.url, "https://example.com/");
        assert_eq!(result.psi.mobile, PsiResult::placeholder());
        assert!(result.seo_score <= 100);
        assert!(report::render_markdown(&result).contains("https://example.com/"));
    }

    #[test]
    fn test_export_file_name_from_result_url() {
        let url = normalize_target_url("https://www.example.com/blog").unwrap();
        assert_eq!(export_file_name(&url), "seo-report-www.example.com.json");
    }
}
