// Connection handling module
// Serves one accepted HTTP connection in its own task

use std::sync::Arc;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config;
use crate::handler;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// The connection runs HTTP/1.1 with keep-alive until the client hangs up;
/// there is no timeout.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address, for access logging
/// * `state` - Shared application state
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<config::AppState>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service_fn(move |req| {
                handler::handle_request(req, peer_addr, Arc::clone(&state))
            }));

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
