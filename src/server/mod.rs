// Server module entry point
// Runs the HTTP listener and the push channel side by side

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword)
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::push;

/// Serve HTTP and the push channel until `shutdown` completes.
///
/// Both listeners are bound by the caller so port conflicts surface before
/// anything runs.
pub async fn run<F>(
    http_listener: TcpListener,
    push_listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    let push_task = tokio::spawn(push::serve_push(push_listener, state.reloader.clone()));

    let result = tokio::select! {
        () = start_server_loop(http_listener, Arc::clone(&state)) => Ok(()),
        res = shutdown => res,
    };

    push_task.abort();
    result
}
