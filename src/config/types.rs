// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
    /// Developer mode: templates are re-read on every request and error
    /// responses carry the failure detail
    pub debug: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

/// HTTP protocol configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Routes configuration
///
/// `pages` is the fixed path → template mapping registered before the
/// listener starts accepting connections; it is never mutated afterwards.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RoutesConfig {
    pub pages: HashMap<String, String>,
    pub templates_dir: String,
    pub static_dir: String,
    pub static_prefix: String,
    pub favicon_paths: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        let mut pages = HashMap::new();
        pages.insert("/".to_string(), "index.html".to_string());
        pages.insert("/test".to_string(), "test.html".to_string());
        Self {
            pages,
            templates_dir: "templates".to_string(),
            static_dir: "static".to_string(),
            static_prefix: "/static".to_string(),
            favicon_paths: vec!["/favicon.ico".to_string(), "/favicon.svg".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes_contain_both_pages() {
        let routes = RoutesConfig::default();
        assert_eq!(routes.pages.len(), 2);
        assert_eq!(routes.pages.get("/"), Some(&"index.html".to_string()));
        assert_eq!(routes.pages.get("/test"), Some(&"test.html".to_string()));
    }

    #[test]
    fn test_default_static_layout() {
        let routes = RoutesConfig::default();
        assert_eq!(routes.templates_dir, "templates");
        assert_eq!(routes.static_dir, "static");
        assert_eq!(routes.static_prefix, "/static");
        assert!(routes.favicon_paths.contains(&"/favicon.ico".to_string()));
    }
}
