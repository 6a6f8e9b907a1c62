//! Markdown rendering of an analysis result

use std::fmt::{self, Write as FmtWrite};

use crate::types::{AnalyzeResult, MetricValue};

const RULE: &str = "─────────────────────────────────────────────────────────────";
const EMPTY_VALUE: &str = "—";

/// Qualitative band for a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    NeedsImprovement,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score.min(100) {
            80.. => ScoreBand::Good,
            50.. => ScoreBand::NeedsImprovement,
            _ => ScoreBand::Poor,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            ScoreBand::Good => "🟢",
            ScoreBand::NeedsImprovement => "🟠",
            ScoreBand::Poor => "🔴",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreBand::Good => "good",
            ScoreBand::NeedsImprovement => "needs improvement",
            ScoreBand::Poor => "poor",
        })
    }
}

/// Render the result the way the CLI prints it
pub fn render_markdown(result: &AnalyzeResult) -> String {
    let mut md = String::new();
    let score = result.seo_score.min(100);
    let band = ScoreBand::from_score(score);

    section(&mut md, &format!("🔎 SEO report: {}", result.url));
    let _ = writeln!(md, "{} SEO Score        : {score}/100 ({band})", band.marker());
    md.push_str("Combined score from PageSpeed SEO and on-page signals.\n\n");

    section(&mut md, "⚡ PageSpeed");
    let mobile = &result.psi.mobile;
    let desktop = &result.psi.desktop;
    let _ = writeln!(md, "• Mobile Performance  : {}", mobile.performance);
    let _ = writeln!(md, "• Desktop Performance : {}", desktop.performance);
    let _ = writeln!(md, "• Mobile SEO          : {}", mobile.seo);
    let _ = writeln!(md, "• Desktop SEO         : {}", desktop.seo);
    md.push('\n');

    section(&mut md, "📈 Core Web Vitals (mobile)");
    let _ = writeln!(md, "• LCP (ms) : {}", format_millis(mobile.cwv.lcp.as_ref()));
    let _ = writeln!(md, "• CLS      : {}", format_cls(mobile.cwv.cls.as_ref()));
    let _ = writeln!(md, "• INP (ms) : {}", format_millis(mobile.cwv.inp.as_ref()));
    md.push('\n');

    section(&mut md, "📄 On-page analysis");
    let onpage = &result.onpage;
    let _ = writeln!(
        md,
        "• Title            : {} ({})",
        onpage.title.as_deref().unwrap_or(EMPTY_VALUE),
        onpage.title_length
    );
    let _ = writeln!(
        md,
        "• Meta Description : {} ({})",
        onpage.meta_description.as_deref().unwrap_or(EMPTY_VALUE),
        onpage.meta_description_length
    );
    let _ = writeln!(md, "• H1 Count         : {}", onpage.h1_count);
    let _ = writeln!(md, "• H2 Count         : {}", onpage.h2_count);
    let _ = writeln!(md, "• On-page Score    : {}/100", onpage.score.min(100));
    md.push('\n');

    section(&mut md, "✅ Recommendations");
    if onpage.recommendations.is_empty() {
        md.push_str("• Looks good, no major on-page issues found.\n");
    } else {
        for recommendation in &onpage.recommendations {
            let _ = writeln!(md, "• {recommendation}");
        }
    }

    md
}

fn section(md: &mut String, heading: &str) {
    md.push_str(RULE);
    md.push('\n');
    md.push_str(heading);
    md.push('\n');
    md.push_str(RULE);
    md.push('\n');
}

/// Whole milliseconds, 0 when the metric is missing
fn format_millis(metric: Option<&MetricValue>) -> String {
    format!("{:.0}", metric.map_or(0.0, |m| m.value))
}

/// Three decimals, 0.000 when the metric is missing
fn format_cls(metric: Option<&MetricValue>) -> String {
    format!("{:.3}", metric.map_or(0.0, |m| m.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::compose_result;
    use crate::onpage::analyze_html;
    use crate::types::{CoreWebVitals, PsiPair, PsiResult, StrategyOutcome};

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(250), ScoreBand::Good);
    }

    #[test]
    fn test_metric_formatting() {
        let lcp = MetricValue {
            value: 2345.6,
            display_value: None,
        };
        let cls = MetricValue {
            value: 0.01234,
            display_value: None,
        };
        assert_eq!(format_millis(Some(&lcp)), "2346");
        assert_eq!(format_millis(None), "0");
        assert_eq!(format_cls(Some(&cls)), "0.012");
        assert_eq!(format_cls(None), "0.000");
    }

    #[test]
    fn test_render_markdown_sections() {
        let mobile = PsiResult {
            performance: 72,
            seo: 90,
            cwv: CoreWebVitals {
                lcp: Some(MetricValue {
                    value: 1800.4,
                    display_value: Some("1.8 s".to_string()),
                }),
                ..CoreWebVitals::default()
            },
            ..PsiResult::default()
        };
        let psi = PsiPair {
            mobile: StrategyOutcome::Success(mobile),
            desktop: StrategyOutcome::Failure("missing".to_string()),
        };
        let result = compose_result(
            "https://example.com/".to_string(),
            psi,
            analyze_html("<html><head><title>Example Domain Page</title></head></html>"),
        );

        let markdown = render_markdown(&result);
        assert!(markdown.contains("SEO report: https://example.com/"));
        assert!(markdown.contains(&format!("SEO Score        : {}/100", result.seo_score)));
        assert!(markdown.contains("• Mobile Performance  : 72"));
        assert!(markdown.contains("• Desktop SEO         : 0"));
        assert!(markdown.contains("• LCP (ms) : 1800"));
        assert!(markdown.contains("• CLS      : 0.000"));
        assert!(markdown.contains("• Title            : Example Domain Page (19)"));
        assert!(markdown.contains("• Meta Description : — (0)"));
        assert!(markdown.contains("• Add a meta description"));
    }

    #[test]
    fn test_render_markdown_without_recommendations() {
        let mut onpage = analyze_html("<html></html>");
        onpage.recommendations.clear();
        let result = compose_result("https://example.com/".to_string(), PsiPair::missing(), onpage);

        let markdown = render_markdown(&result);
        assert!(markdown.contains("Looks good, no major on-page issues found."));
    }
}
