// Signal handling module
//
// Supported signals:
// - SIGUSR1: Broadcast a reload to every connected browser
// - SIGTERM: Shutdown
// - SIGINT:  Shutdown (Ctrl+C)

use crate::logger;
use crate::push::Reloader;

/// Wait for a shutdown signal, forwarding manual reloads meanwhile (Unix only)
///
/// | Signal  | Action                   |
/// |---------|--------------------------|
/// | SIGUSR1 | Reload connected clients |
/// | SIGTERM | Stop                     |
/// | SIGINT  | Stop                     |
#[cfg(unix)]
pub async fn wait_for_shutdown(reloader: Reloader) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;

    logger::log_info(&format!(
        "[SIGNAL] kill -USR1 {} forces a reload",
        std::process::id()
    ));

    loop {
        tokio::select! {
            _ = sigusr1.recv() => {
                let clients = reloader.broadcast_reload();
                logger::log_reload("SIGUSR1 received", clients);
            }
            _ = sigterm.recv() => {
                logger::log_info("\n[SIGNAL] SIGTERM received, shutting down");
                return Ok(());
            }
            _ = sigint.recv() => {
                logger::log_info("\n[SIGNAL] SIGINT received, shutting down");
                return Ok(());
            }
        }
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_shutdown(_reloader: Reloader) -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    logger::log_info("\n[SIGNAL] Ctrl+C received, shutting down");
    Ok(())
}
