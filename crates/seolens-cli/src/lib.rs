//! Command line front end for seolens
//!
//! Argument parsing and the run loop live here so they can be tested
//! without spawning the binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use seolens_core::report::render_markdown;
use seolens_core::{AnalyzeResult, Analyzer, export_file_name, load_analyzer_config};

pub const APP_NAME: &str = "seolens";

#[derive(Debug, Parser)]
#[command(name = APP_NAME, version)]
#[command(about = "seolens: on-page SEO checks blended with PageSpeed Insights scores")]
#[command(after_help = "Developed by Pon Datalab")]
pub struct Cli {
    /// Page to analyze; `https://` is assumed when no scheme is given
    pub url: String,

    /// Print the full result as JSON instead of the markdown report
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON result to DIR/seo-report-<host>.json (`--export=DIR`)
    #[arg(
        short = 's',
        long,
        value_name = "DIR",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "."
    )]
    pub export: Option<PathBuf>,

    /// PageSpeed Insights API key; PageSpeed is skipped without one
    #[arg(long, env = "GOOGLE_PAGESPEED_API_KEY", hide_env_values = true)]
    pub pagespeed_key: Option<String>,
}

/// Analyze the requested page and print the report to stdout.
///
/// # Errors
///
/// Returns an error for invalid configuration, a rejected URL, a page that
/// cannot be fetched, or an export file that cannot be written.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = load_analyzer_config()?;
    if let Some(key) = cli.pagespeed_key.filter(|key| !key.trim().is_empty()) {
        config.pagespeed_api_key = Some(key.trim().to_string());
    }

    let analyzer = Analyzer::new(&config)?;
    if !analyzer.has_pagespeed() {
        tracing::warn!("no PageSpeed API key configured; PageSpeed scores will be 0");
    }

    let result = analyzer.analyze(&cli.url).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_markdown(&result));
    }

    if let Some(dir) = cli.export {
        let path = write_export(&dir, &result)?;
        eprintln!("\nWrote JSON report to {}", path.display());
    }

    Ok(())
}

/// Write the pretty JSON result into `dir`, creating it if needed
pub fn write_export(dir: &Path, result: &AnalyzeResult) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let path = dir.join(export_file_name(&result.url));
    let json = serde_json::to_string_pretty(result)?;
    fs::write(&path, json.as_bytes())
        .with_context(|| format!("failed to write output file {}", path.display()))?;

    tracing::info!(path = %path.display(), "exported JSON report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seolens_core::analyze::compose_result;
    use seolens_core::onpage::analyze_html;
    use seolens_core::types::PsiPair;

    #[test]
    fn parses_bare_url() {
        let cli = Cli::try_parse_from(["seolens", "example.com"]).expect("expected valid cli args");
        assert_eq!(cli.url, "example.com");
        assert!(!cli.json);
        assert!(cli.export.is_none());
    }

    #[test]
    fn parses_json_flag() {
        let cli = Cli::try_parse_from(["seolens", "--json", "example.com"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn export_without_dir_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["seolens", "example.com", "--export"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from(".")));
    }

    #[test]
    fn export_with_dir() {
        let cli = Cli::try_parse_from(["seolens", "example.com", "--export=reports"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("reports")));
    }

    #[test]
    fn export_before_url_does_not_swallow_it() {
        let cli = Cli::try_parse_from(["seolens", "--export", "example.com"]).unwrap();
        assert_eq!(cli.url, "example.com");
        assert_eq!(cli.export, Some(PathBuf::from(".")));
    }

    #[test]
    fn pagespeed_key_flag() {
        let cli =
            Cli::try_parse_from(["seolens", "--pagespeed-key", "abc123", "example.com"]).unwrap();
        assert_eq!(cli.pagespeed_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_url_is_an_error() {
        assert!(Cli::try_parse_from(["seolens"]).is_err());
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(Cli::try_parse_from(["seolens", "--graph", "example.com"]).is_err());
    }

    #[test]
    fn write_export_names_file_after_host() {
        let dir = std::env::temp_dir().join(format!("seolens-export-{}", std::process::id()));
        let result = compose_result(
            "https://www.example.com/".to_string(),
            PsiPair::missing(),
            analyze_html("<html><head><title>Example Domain Page</title></head></html>"),
        );

        let path = write_export(&dir, &result).unwrap();
        assert_eq!(path, dir.join("seo-report-www.example.com.json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["url"], "https://www.example.com/");
        assert_eq!(written["onpage"]["title"], "Example Domain Page");

        fs::remove_dir_all(&dir).unwrap();
    }
}
