//! On-page SEO checklist and scoring
//!
//! Eight fixed checks run in order. Each contributes one pass/fail bit to the
//! score and may add recommendations; the recommendation list keeps the
//! checklist order.

use std::ops::RangeInclusive;

use reqwest::Client;

use crate::error::AnalyzeError;
use crate::parser::{PageSignals, extract_page_signals, fetch_html};
use crate::types::OnPageReport;

pub const TITLE_LENGTH_RANGE: RangeInclusive<usize> = 10..=70;
pub const META_DESCRIPTION_LENGTH_RANGE: RangeInclusive<usize> = 50..=320;

pub const ADD_TITLE: &str = "Add a descriptive title tag (50-60 chars recommended).";
pub const ADD_META_DESCRIPTION: &str = "Add a meta description (120-160 chars recommended).";
pub const ADD_H1: &str = "Add an H1 tag for the page";
pub const SINGLE_H1: &str = "Consider limiting to a single H1 tag";
pub const ADD_H2: &str = "Add H2 sections to improve content structure";
pub const ADD_CANONICAL: &str = "Add a canonical link tag to avoid duplicate content issues.";
pub const ADD_ROBOTS: &str = "Add a robots meta tag if you need custom indexing directives.";
pub const ADD_OPEN_GRAPH: &str = "Add Open Graph tags for better social sharing.";

/// Fetch a page and run the checklist against it.
///
/// A failed fetch aborts the whole analysis; there is no partial report.
pub async fn analyze_on_page(client: &Client, url: &str) -> Result<OnPageReport, AnalyzeError> {
    let html = fetch_html(client, url).await.map_err(AnalyzeError::Fetch)?;
    Ok(analyze_html(&html))
}

/// Run the checklist against an already fetched document
pub fn analyze_html(html: &str) -> OnPageReport {
    build_report(extract_page_signals(html))
}

/// Round `100 * passed / total` half up. An empty checklist scores 100.
pub fn score_from_checks(checks: &[bool]) -> u8 {
    if checks.is_empty() {
        return 100;
    }

    let total = checks.len();
    let passed = checks.iter().filter(|passed| **passed).count();
    ((passed * 200 + total) / (2 * total)) as u8
}

#[derive(Debug, Default)]
struct Checklist {
    checks: Vec<bool>,
    recommendations: Vec<String>,
}

impl Checklist {
    fn check(&mut self, passed: bool) {
        self.checks.push(passed);
    }

    fn recommend(&mut self, message: impl Into<String>) {
        self.recommendations.push(message.into());
    }

    /// Presence plus length-range check shared by title and description
    fn check_text(
        &mut self,
        label: &str,
        length: Option<usize>,
        range: &RangeInclusive<usize>,
        missing_message: &str,
    ) {
        match length {
            None => self.recommend(missing_message),
            Some(length) if !range.contains(&length) => self.recommend(format!(
                "{label} is {length} characters; keep it between {} and {}.",
                range.start(),
                range.end()
            )),
            Some(_) => {}
        }
        self.check(length.is_some_and(|length| range.contains(&length)));
    }
}

/// Apply the checklist to extracted signals
pub fn build_report(signals: PageSignals) -> OnPageReport {
    let mut list = Checklist::default();

    let title_length = signals.title.as_deref().map(char_count);
    list.check_text("Title", title_length, &TITLE_LENGTH_RANGE, ADD_TITLE);

    let description_length = signals.meta_description.as_deref().map(char_count);
    list.check_text(
        "Meta description",
        description_length,
        &META_DESCRIPTION_LENGTH_RANGE,
        ADD_META_DESCRIPTION,
    );

    if signals.h1_count == 0 {
        list.recommend(ADD_H1);
    }
    if signals.h1_count > 1 {
        list.recommend(SINGLE_H1);
    }
    list.check(signals.h1_count == 1);

    if signals.h2_count == 0 {
        list.recommend(ADD_H2);
    }
    list.check(signals.h2_count >= 1);

    let images_missing_alt: Vec<_> = signals
        .images
        .into_iter()
        .filter(|image| image.alt.as_deref().is_none_or(|alt| alt.trim().is_empty()))
        .collect();
    if !images_missing_alt.is_empty() {
        list.recommend(format!(
            "Add alt attributes to {} images.",
            images_missing_alt.len()
        ));
    }
    list.check(images_missing_alt.is_empty());

    let has_canonical = signals.canonical.as_deref().is_some_and(|v| !v.is_empty());
    if !has_canonical {
        list.recommend(ADD_CANONICAL);
    }
    list.check(has_canonical);

    let has_robots = signals.robots.as_deref().is_some_and(|v| !v.is_empty());
    if !has_robots {
        list.recommend(ADD_ROBOTS);
    }
    list.check(has_robots);

    if signals.open_graph.is_empty() {
        list.recommend(ADD_OPEN_GRAPH);
    }
    list.check(!signals.open_graph.is_empty());

    OnPageReport {
        title: signals.title,
        title_length: title_length.unwrap_or(0),
        meta_description: signals.meta_description,
        meta_description_length: description_length.unwrap_or(0),
        h1_count: signals.h1_count,
        h2_count: signals.h2_count,
        images_missing_alt,
        canonical: signals.canonical,
        robots: signals.robots,
        open_graph: signals.open_graph,
        score: score_from_checks(&list.checks),
        recommendations: list.recommendations,
    }
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}
