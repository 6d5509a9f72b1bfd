// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, ContentConfig, HttpConfig, LoggingConfig, ServerConfig, WatchConfig,
    DEFAULT_HTTP_PORT, DEFAULT_PUSH_PORT,
};

/// Config file looked up by `Config::load` (extension picked by the `config` crate)
pub const DEFAULT_CONFIG_FILE: &str = "devserver";

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Environment variables prefixed with `DEVSERVER_` override the file,
    /// nested keys separated by `__` (`DEVSERVER_SERVER__HTTP_PORT=7000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", defaults.server.host)?
            .set_default("server.http_port", i64::from(defaults.server.http_port))?
            .set_default("server.push_port", i64::from(defaults.server.push_port))?
            .set_default("content.root", defaults.content.root)?
            .set_default("content.reload_script", defaults.content.reload_script)?
            .set_default("http.infer_content_type", defaults.http.infer_content_type)?
            .set_default("logging.access_log", defaults.logging.access_log)?
            .set_default("logging.access_log_format", defaults.logging.access_log_format)?
            .set_default("watch.enabled", defaults.watch.enabled)?
            .set_default("watch.debounce_ms", defaults.watch.debounce_ms)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_http_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.http_port)
            .parse()
            .map_err(|e| format!("Invalid HTTP address: {e}"))
    }

    pub fn get_push_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.push_port)
            .parse()
            .map_err(|e| format!("Invalid push channel address: {e}"))
    }
}
