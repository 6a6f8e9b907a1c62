use std::env::VarError;
use std::net::SocketAddr;

use seolens_core::{AnalyzerConfig, ConfigError, build_analyzer_config};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub analyzer: AnalyzerConfig,
}

/// Load server configuration, reading a `.env` file first if present.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for an unparseable bind address or
/// analyzer setting.
pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_server_config(|key| std::env::var(key))
}

/// Build server configuration from an env-var lookup function.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for an unparseable bind address or
/// analyzer setting.
pub fn build_server_config<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let raw_bind = lookup("SEOLENS_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = raw_bind
        .trim()
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "SEOLENS_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let log_level = lookup("SEOLENS_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

    Ok(ServerConfig {
        bind_addr,
        log_level,
        analyzer: build_analyzer_config(&lookup)?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let map = HashMap::new();
        let config = build_server_config(lookup_from_map(&map)).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, "info");
        assert!(config.analyzer.pagespeed_api_key.is_none());
    }

    #[test]
    fn reads_bind_addr_and_analyzer_settings() {
        let mut map = HashMap::new();
        map.insert("SEOLENS_BIND_ADDR", "0.0.0.0:8080");
        map.insert("SEOLENS_LOG_LEVEL", "debug");
        map.insert("GOOGLE_PAGESPEED_API_KEY", "key-123");

        let config = build_server_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.analyzer.pagespeed_api_key.as_deref(), Some("key-123"));
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let mut map = HashMap::new();
        map.insert("SEOLENS_BIND_ADDR", "localhost");
        let result = build_server_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SEOLENS_BIND_ADDR"),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut map = HashMap::new();
        map.insert("GOOGLE_PAGESPEED_API_KEY", "super-secret");
        let config = build_server_config(lookup_from_map(&map)).unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
