// The accept loop.
// Hands every accepted connection to its own task; never does
// request-level work inline.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::logger;

use super::conn;
use super::ServerState;

/// Accept until the shutdown signal fires. Accept errors are logged and
/// the loop keeps going; one bad accept must not take the server down.
pub(crate) async fn run(listener: &TcpListener, state: &Arc<ServerState>) {
    let mut shutdown_rx = state.shutdown.subscribe();
    if state.shutdown.is_requested() {
        return;
    }

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        conn::accept_connection(stream, peer_addr, state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown_rx.changed() => break,
        }
    }
}
