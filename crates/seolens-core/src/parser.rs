//! HTML fetching and parsing functionality

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::types::ImageRef;

/// Redirect hops followed before a page fetch gives up
pub const MAX_REDIRECTS: usize = 10;

/// Build the HTTP client shared by the page fetcher and the PageSpeed client
pub fn build_http_client(user_agent: &str, timeout_secs: u64) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Fetch HTML content from a URL
///
/// The response status is not checked: error pages are analyzed like any
/// other document, only transport failures are errors.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to fetch URL")?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url, status = status.as_u16(), "page returned a non-success status");
    }

    let html = response
        .text()
        .await
        .context("Failed to read response body")?;
    tracing::debug!(url, bytes = html.len(), "fetched page");
    Ok(html)
}

/// Raw on-page signals pulled out of one document, before any scoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    /// Trimmed `<title>` text; `None` when missing or blank
    pub title: Option<String>,
    /// Trimmed description `content`; `None` when missing or blank
    pub meta_description: Option<String>,
    pub h1_count: usize,
    pub h2_count: usize,
    pub images: Vec<ImageRef>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub open_graph: BTreeMap<String, String>,
}

/// Extract the on-page signals the checklist runs against
pub fn extract_page_signals(html: &str) -> PageSignals {
    let document = Html::parse_document(html);

    let title = select_first(&document, "title")
        .map(|element| element.text().collect::<String>())
        .and_then(|text| non_blank(&text));

    let meta_description = select_first(&document, r#"meta[name="description"]"#)
        .and_then(|element| element.value().attr("content"))
        .and_then(non_blank);

    let images = select_all(&document, "img")
        .into_iter()
        .map(|element| ImageRef {
            src: element.value().attr("src").map(str::to_string),
            alt: element.value().attr("alt").map(str::to_string),
        })
        .collect();

    let canonical = select_first(&document, r#"link[rel="canonical"]"#)
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string);

    let robots = select_first(&document, r#"meta[name="robots"]"#)
        .and_then(|element| element.value().attr("content"))
        .map(str::to_string);

    PageSignals {
        title,
        meta_description,
        h1_count: count_elements(&document, "h1"),
        h2_count: count_elements(&document, "h2"),
        images,
        canonical,
        robots,
        open_graph: extract_open_graph(&document),
    }
}

/// Collect `og:*` meta properties. Later duplicates win.
fn extract_open_graph(document: &Html) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();

    for element in select_all(document, r#"meta[property^="og:"]"#) {
        let property = element.value().attr("property").unwrap_or_default();
        let content = element.value().attr("content").unwrap_or_default();
        if !property.is_empty() && !content.is_empty() {
            tags.insert(property.to_string(), content.to_string());
        }
    }

    tags
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Helper functions
fn select_all<'a>(document: &'a Html, selector_str: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector_str) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn select_first<'a>(document: &'a Html, selector_str: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector_str).ok()?;
    document.select(&selector).next()
}

fn count_elements(document: &Html, selector_str: &str) -> usize {
    if let Ok(selector) = Selector::parse(selector_str) {
        document.select(&selector).count()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_trimmed() {
        let html = "<html><head><title>  Test Title \n</title></head></html>";
        let signals = extract_page_signals(html);
        assert_eq!(signals.title.as_deref(), Some("Test Title"));
    }

    #[test]
    fn test_blank_title_is_absent() {
        let html = "<html><head><title>   </title></head></html>";
        let signals = extract_page_signals(html);
        assert!(signals.title.is_none());
    }

    #[test]
    fn test_extract_meta_description() {
        let html = r#"<html><head><meta name="description" content=" A description "></head></html>"#;
        let signals = extract_page_signals(html);
        assert_eq!(signals.meta_description.as_deref(), Some("A description"));
    }

    #[test]
    fn test_meta_description_without_content_is_absent() {
        let html = r#"<html><head><meta name="description"></head></html>"#;
        let signals = extract_page_signals(html);
        assert!(signals.meta_description.is_none());
    }

    #[test]
    fn test_heading_counts() {
        let html = "<body><h1>A</h1><h2>B</h2><h2>C</h2><h3>D</h3></body>";
        let signals = extract_page_signals(html);
        assert_eq!(signals.h1_count, 1);
        assert_eq!(signals.h2_count, 2);
    }

    #[test]
    fn test_images_keep_src_and_alt() {
        let html = r#"<body><img src="/a.png" alt="logo"><img alt=""><img src="/c.png"></body>"#;
        let signals = extract_page_signals(html);
        assert_eq!(
            signals.images,
            vec![
                ImageRef {
                    src: Some("/a.png".to_string()),
                    alt: Some("logo".to_string()),
                },
                ImageRef {
                    src: None,
                    alt: Some(String::new()),
                },
                ImageRef {
                    src: Some("/c.png".to_string()),
                    alt: None,
                },
            ]
        );
    }

    #[test]
    fn test_canonical_and_robots_raw_values() {
        let html = r#"
            <head>
                <link rel="canonical" href="https://example.com/page">
                <meta name="robots" content="noindex, nofollow">
            </head>
        "#;
        let signals = extract_page_signals(html);
        assert_eq!(signals.canonical.as_deref(), Some("https://example.com/page"));
        assert_eq!(signals.robots.as_deref(), Some("noindex, nofollow"));
    }

    #[test]
    fn test_canonical_without_href_is_absent() {
        let html = r#"<head><link rel="canonical"></head>"#;
        let signals = extract_page_signals(html);
        assert!(signals.canonical.is_none());
    }

    #[test]
    fn test_open_graph_skips_empty_and_keeps_last_duplicate() {
        let html = r#"
            <head>
                <meta property="og:title" content="First">
                <meta property="og:title" content="Second">
                <meta property="og:image" content="">
                <meta property="twitter:card" content="summary">
                <meta property="og:type" content="website">
            </head>
        "#;
        let signals = extract_page_signals(html);
        assert_eq!(signals.open_graph.len(), 2);
        assert_eq!(signals.open_graph["og:title"], "Second");
        assert_eq!(signals.open_graph["og:type"], "website");
    }

    #[test]
    fn test_empty_document() {
        let signals = extract_page_signals("");
        assert_eq!(signals, PageSignals::default());
    }
}
