//! livedev - local development file server
//!
//! Serves a directory over HTTP and tells connected browsers to reload
//! through a WebSocket push channel when files change.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod push;
pub mod routing;
pub mod server;
pub mod watcher;
