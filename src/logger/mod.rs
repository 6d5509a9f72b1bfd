//! Logger module
//!
//! Provides logging utilities for the dev server including:
//! - Server lifecycle logging
//! - Access logging in several formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(http_addr: &SocketAddr, push_addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Dev server started");
    write_info(&format!("Serving: {}", config.content.root));
    write_info(&format!("Listening on: http://{http_addr}"));
    write_info(&format!("Reload channel: ws://{push_addr}"));
    if config.watch.enabled {
        write_info(&format!(
            "Watching for changes (debounce {}ms)",
            config.watch.debounce_ms
        ));
    }
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_info(message: &str) {
    write_info(message);
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_push_client(peer_addr: &SocketAddr, connected: bool, clients: usize) {
    let action = if connected { "connected" } else { "disconnected" };
    write_info(&format!("[Push] {peer_addr} {action} ({clients} active)"));
}

pub fn log_reload(reason: &str, clients: usize) {
    write_info(&format!("[Reload] {reason}, notified {clients} client(s)"));
}
