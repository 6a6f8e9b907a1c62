//! Request orchestration: validate, run both analyses, blend the scores

use reqwest::Client;

use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::onpage::analyze_on_page;
use crate::pagespeed::PageSpeedClient;
use crate::parser::build_http_client;
use crate::types::{AnalyzeResult, OnPageReport, PsiPair, PsiScores};
use crate::url_utils::normalize_target_url;

/// Weight of the PageSpeed mobile SEO score in the blended score, in tenths
const PAGESPEED_WEIGHT: u32 = 6;
/// Weight of the on-page score in the blended score, in tenths
const ONPAGE_WEIGHT: u32 = 4;

/// Entry point shared by the HTTP API and the CLI.
///
/// Holds no per-request state; clones share one connection pool.
#[derive(Clone)]
pub struct Analyzer {
    client: Client,
    pagespeed: Option<PageSpeedClient>,
}

impl Analyzer {
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzeError> {
        let client = build_http_client(&config.user_agent, config.request_timeout_secs)
            .map_err(AnalyzeError::Client)?;

        let pagespeed = config.pagespeed_api_key.as_ref().map(|key| {
            PageSpeedClient::new(client.clone(), config.pagespeed_endpoint.clone(), key.clone())
        });

        Ok(Self { client, pagespeed })
    }

    pub fn has_pagespeed(&self) -> bool {
        self.pagespeed.is_some()
    }

    /// Analyze raw user input.
    ///
    /// The on-page fetch and the PageSpeed calls run concurrently. Dropping
    /// the returned future stops both. PageSpeed failures never fail the
    /// request.
    ///
    /// # Errors
    ///
    /// - [`AnalyzeError::InvalidUrl`] before any I/O if the input is rejected.
    /// - [`AnalyzeError::Fetch`] if the page itself cannot be fetched.
    pub async fn analyze(&self, input: &str) -> Result<AnalyzeResult, AnalyzeError> {
        let url = normalize_target_url(input)?;
        tracing::info!(url = %url, pagespeed = self.has_pagespeed(), "analyzing page");

        let psi = async {
            match &self.pagespeed {
                Some(pagespeed) => pagespeed.fetch_both(&url).await,
                None => {
                    tracing::debug!("no PageSpeed key configured; skipping external scores");
                    PsiPair::missing()
                }
            }
        };

        let (onpage, psi) = tokio::join!(analyze_on_page(&self.client, &url), psi);
        let onpage = onpage?;

        let result = compose_result(url, psi, onpage);
        tracing::info!(
            url = %result.url,
            seo_score = result.seo_score,
            onpage_score = result.onpage.score,
            "analysis complete"
        );
        Ok(result)
    }
}

/// Reconcile the PageSpeed outcomes with the on-page report.
///
/// Failed strategies become zero placeholders; their messages are not part
/// of the result.
pub fn compose_result(url: String, psi: PsiPair, onpage: OnPageReport) -> AnalyzeResult {
    let seo_score = blended_score(psi.mobile.seo(), onpage.score);

    AnalyzeResult {
        url,
        psi: PsiScores {
            mobile: psi.mobile.into_result_or_placeholder(),
            desktop: psi.desktop.into_result_or_placeholder(),
        },
        onpage,
        seo_score,
    }
}

/// `round(0.6 * mobile_seo + 0.4 * onpage_score)`, computed in integers.
pub fn blended_score(mobile_seo: u8, onpage_score: u8) -> u8 {
    let weighted =
        PAGESPEED_WEIGHT * u32::from(mobile_seo) + ONPAGE_WEIGHT * u32::from(onpage_score);
    ((weighted + 5) / 10).min(100) as u8
}
