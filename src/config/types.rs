// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 6700;
pub const DEFAULT_PUSH_PORT: u16 = 6800;
pub const DEFAULT_CONTENT_ROOT: &str = "public";
pub const DEFAULT_RELOAD_SCRIPT: &str = "assets/client-websocket.js";
pub const DEFAULT_ACCESS_LOG_FORMAT: &str = "dev";
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub watch: WatchConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    /// Port of the static file server
    pub http_port: u16,
    /// Port of the WebSocket reload channel
    pub push_port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            push_port: DEFAULT_PUSH_PORT,
            workers: None,
        }
    }
}

/// What gets served and injected
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Directory static files are served from
    pub root: String,
    /// Client script appended to every HTML response
    pub reload_script: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_CONTENT_ROOT.to_string(),
            reload_script: DEFAULT_RELOAD_SCRIPT.to_string(),
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HttpConfig {
    /// Send a Content-Type for every known extension, not only SVG
    #[serde(default)]
    pub infer_content_type: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (dev, common or json)
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
    DEFAULT_ACCESS_LOG_FORMAT.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// File watcher configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    pub enabled: bool,
    /// Quiet period folding a burst of changes into one reload
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}
