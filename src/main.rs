use std::sync::Arc;
use std::time::Duration;

use livedev::config::{AppState, Config};
use livedev::{logger, server, watcher};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Worker count comes from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(&cfg)?);

    let http_addr = cfg.get_http_socket_addr()?;
    let push_addr = cfg.get_push_socket_addr()?;
    let http_listener = server::create_reusable_listener(http_addr)?;
    let push_listener = server::create_reusable_listener(push_addr)?;

    let _watch = if cfg.watch.enabled {
        match watcher::spawn(
            &state.content_root,
            Duration::from_millis(cfg.watch.debounce_ms),
            state.reloader.clone(),
        ) {
            Ok(handle) => Some(handle),
            Err(e) => {
                logger::log_warning(&format!(
                    "Not watching '{}': {e}",
                    state.content_root.display()
                ));
                None
            }
        }
    } else {
        None
    };

    logger::log_server_start(&http_addr, &push_addr, &cfg);

    let shutdown = server::signal::wait_for_shutdown(state.reloader.clone());
    server::run(http_listener, push_listener, state, shutdown).await?;
    Ok(())
}
