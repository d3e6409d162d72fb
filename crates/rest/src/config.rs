//! Server configuration for the ZTC REST API.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ZTC_SERVER_PORT` | 8080 | Server port |
//! | `ZTC_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `ZTC_LOG_LEVEL` | info | Log level |
//! | `ZTC_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `ZTC_ENABLE_CORS` | true | Enable CORS |
//! | `ZTC_CORS_ORIGINS` | * | Allowed origins |
//! | `ZTC_CORS_METHODS` | GET,OPTIONS | Allowed methods |
//! | `ZTC_CORS_HEADERS` | Accept,Content-Type,API-Version | Allowed headers |
//! | `ZTC_BASE_URL` | http://localhost:8080 | Prefix of every link in responses |
//! | `ZTC_API_VERSION` | 1.0.0 | Value of the `API-Version` response header |
//! | `ZTC_EXPAND_PARAM` | expand | Name of the expansion parameter |
//! | `ZTC_FIELDS_PARAM` | fields | Name of the field selection parameter |
//! | `ZTC_SORT_PARAM` | sorteer | Name of the sort parameter |
//! | `ZTC_SEARCH_PARAM` | zoek | Name of the search parameter |
//! | `ZTC_EXPAND_ALL_VALUE` | true | Expansion value meaning "expand everything" |
//! | `ZTC_MAX_EXPAND_DEPTH` | 3 | Longest accepted expansion path |
//! | `ZTC_SEED_FILE` | - | JSON seed file loaded at startup |
//!
//! # Example
//!
//! ```rust
//! use ztc_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     base_url: "https://ztc.example.nl/api".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Server configuration for the ZTC REST API.
///
/// Can be built from command line arguments with [`ServerConfig::parse`],
/// from the environment with [`ServerConfig::from_env`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "ztc")]
#[command(about = "Catalog type registry (ZTC) REST API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "ZTC_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "ZTC_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "ZTC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "ZTC_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "ZTC_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "ZTC_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "ZTC_CORS_METHODS", default_value = "GET,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "ZTC_CORS_HEADERS",
        default_value = "Accept,Content-Type,API-Version"
    )]
    pub cors_headers: String,

    /// Base URL for the server, used as the prefix of every link.
    #[arg(long, env = "ZTC_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// API version reported in the `API-Version` response header.
    #[arg(long, env = "ZTC_API_VERSION", default_value = "1.0.0")]
    pub api_version: String,

    /// Name of the relation expansion query parameter.
    #[arg(long, env = "ZTC_EXPAND_PARAM", default_value = "expand")]
    pub expand_param: String,

    /// Name of the field selection query parameter.
    #[arg(long, env = "ZTC_FIELDS_PARAM", default_value = "fields")]
    pub fields_param: String,

    /// Name of the sort query parameter.
    #[arg(long, env = "ZTC_SORT_PARAM", default_value = "sorteer")]
    pub sort_param: String,

    /// Name of the free-text search query parameter.
    #[arg(long, env = "ZTC_SEARCH_PARAM", default_value = "zoek")]
    pub search_param: String,

    /// Expansion parameter value that expands every expandable relation.
    #[arg(long, env = "ZTC_EXPAND_ALL_VALUE", default_value = "true")]
    pub expand_all_value: String,

    /// Maximum number of segments in an expansion path.
    #[arg(long, env = "ZTC_MAX_EXPAND_DEPTH", default_value = "3")]
    pub max_expand_depth: usize,

    /// JSON seed file with the catalog contents.
    #[arg(long, env = "ZTC_SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,OPTIONS".to_string(),
            cors_headers: "Accept,Content-Type,API-Version".to_string(),
            base_url: "http://localhost:8080".to_string(),
            api_version: "1.0.0".to_string(),
            expand_param: "expand".to_string(),
            fields_param: "fields".to_string(),
            sort_param: "sorteer".to_string(),
            search_param: "zoek".to_string(),
            expand_all_value: "true".to_string(),
            max_expand_depth: 3,
            seed_file: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Parses the environment without requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Names of the query parameters that are not list filters.
    pub fn reserved_params(&self) -> [&str; 4] {
        [
            &self.expand_param,
            &self.fields_param,
            &self.sort_param,
            &self.search_param,
        ]
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.max_expand_depth == 0 {
            errors.push("Maximum expansion depth cannot be 0".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            errors.push(format!("Base URL '{}' is not an absolute URL", self.base_url));
        }

        if self.expand_all_value.trim().is_empty() {
            errors.push("Expand-all value cannot be empty".to_string());
        }

        let params = self.reserved_params();
        if params.iter().any(|p| p.trim().is_empty()) {
            errors.push("Query parameter names cannot be empty".to_string());
        }
        for (i, param) in params.iter().enumerate() {
            if params[..i].contains(param) {
                errors.push(format!("Query parameter name '{param}' is used twice"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses ephemeral port 0, a fixed base URL and no CORS.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://testserver".to_string(),
            ..Self::default()
        }
    }
}
