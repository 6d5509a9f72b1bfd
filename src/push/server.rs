// Push channel listener
// Upgrades each connection to a WebSocket and relays reload signals to it

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::tungstenite::Message;

use super::{Reloader, RELOAD_MESSAGE};
use crate::logger;

/// Accept push channel clients forever
pub async fn serve_push(listener: TcpListener, reloader: Reloader) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                tokio::spawn(run_session(stream, peer_addr, reloader.clone()));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept push connection: {e}"));
            }
        }
    }
}

/// Hold one client open until it leaves, forwarding every reload signal
async fn run_session(stream: TcpStream, peer_addr: SocketAddr, reloader: Reloader) {
    let ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            logger::log_warning(&format!("WebSocket handshake with {peer_addr} failed: {e}"));
            return;
        }
    };

    let mut signals = reloader.subscribe();
    logger::log_push_client(&peer_addr, true, reloader.client_count());

    let (mut outgoing, mut incoming) = ws.split();
    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                // Missed signals collapse into this one
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    let reload = Message::Text(RELOAD_MESSAGE.to_string());
                    if outgoing.send(reload).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            },
            frame = incoming.next() => match frame {
                // Clients have nothing to say; only a hang-up matters
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    drop(signals);
    logger::log_push_client(&peer_addr, false, reloader.client_count());
}
