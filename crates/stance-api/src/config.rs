//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Directory for temporary uploads
    pub upload_dir: PathBuf,
    /// Wall-clock bound for one analysis
    pub analysis_timeout: Duration,
    /// Analyses allowed to run at once
    pub max_concurrent_analyses: usize,
    /// Downscale decoded frames wider than this (0 = native size)
    pub decode_max_width: u32,
    /// Name reported by the health endpoint
    pub service_name: String,
    /// Environment (development/production)
    pub environment: String,
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 200 * 1024 * 1024, // 200MB
            upload_dir: PathBuf::from("uploaded_videos"),
            analysis_timeout: Duration::from_secs(300),
            max_concurrent_analyses: 2,
            decode_max_width: 0,
            service_name: "Stance Movement Analysis Server".to_string(),
            environment: "development".to_string(),
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            analysis_timeout: env_parse("ANALYSIS_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.analysis_timeout),
            max_concurrent_analyses: env_parse::<usize>("MAX_CONCURRENT_ANALYSES")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_concurrent_analyses),
            decode_max_width: env_parse("DECODE_MAX_WIDTH").unwrap_or(defaults.decode_max_width),
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.environment)
    }
}

/// Whether an `ENVIRONMENT` value names production (case-insensitive).
pub fn is_production_environment(environment: &str) -> bool {
    environment.trim().eq_ignore_ascii_case("production")
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.upload_dir, PathBuf::from("uploaded_videos"));
        assert_eq!(config.analysis_timeout, Duration::from_secs(300));
        assert_eq!(config.max_concurrent_analyses, 2);
        assert!(!config.is_production());
    }

    #[test]
    fn test_production_environment_ignores_case() {
        assert!(is_production_environment("production"));
        assert!(is_production_environment("Production"));
        assert!(is_production_environment("PRODUCTION"));
        assert!(!is_production_environment("staging"));

        let config = ApiConfig {
            environment: "Production".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.is_production());
    }
}
