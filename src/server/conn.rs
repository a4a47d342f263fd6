// Per-connection handling unit.
// One spawned task per accepted connection: HTTP/1.1 serving with
// keep-alive, idle timeout, and cooperative shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;

use crate::logger;

use super::dispatch;
use super::ServerState;

/// Grace applied if the shutdown value cannot be read; the signal
/// sender lives in `ServerState`, which every task holds, so this is
/// effectively unreachable.
const FALLBACK_GRACE: Duration = Duration::from_secs(5);

/// Register an accepted connection and spawn its handling task.
pub(crate) fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServerState>,
) {
    // Increment first, then check the cap, so two racing accepts cannot
    // both slip under the limit.
    let prev_count = state.connections.acquire();
    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.connections.release();
            logger::log_connection_rejected(prev_count, max_conn);
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    let state = Arc::clone(state);
    tokio::spawn(async move {
        serve_http1(stream, peer_addr, &state).await;
        state.connections.release();
    });
}

/// Serve HTTP/1.1 on one connection until it closes, errors out, or the
/// shutdown grace period expires.
///
/// Hyper owns the protocol state machine: request framing, keep-alive
/// accounting, and the automatic 400 on an unparseable request head
/// (the handler is never consulted for those).
async fn serve_http1(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<ServerState>) {
    let io = TokioIo::new(stream);

    let svc_state = Arc::clone(state);
    let service = service_fn(move |req| {
        let state = Arc::clone(&svc_state);
        async move { dispatch::handle_request(req, &state, peer_addr).await }
    });

    let mut builder = http1::Builder::new();
    builder.timer(TokioTimer::new());
    builder.keep_alive(state.config.performance.keep_alive);
    let idle = state.config.performance.idle_timeout;
    if idle > 0 {
        // Bounds the wait for a request head, including the wait for
        // the next request on a kept-alive connection.
        builder.header_read_timeout(Duration::from_secs(idle));
    }

    let conn = builder.serve_connection(io, service);
    tokio::pin!(conn);

    let mut shutdown_rx = state.shutdown.subscribe();
    let pending_grace = *shutdown_rx.borrow();

    let result = if let Some(grace) = pending_grace {
        // Stop was requested between accept and task startup.
        conn.as_mut().graceful_shutdown();
        match tokio::time::timeout(grace, conn.as_mut()).await {
            Ok(res) => res,
            Err(_) => {
                state.connections.record_forced();
                logger::log_forced_close(&peer_addr);
                Ok(())
            }
        }
    } else {
        tokio::select! {
            res = conn.as_mut() => res,
            _ = shutdown_rx.changed() => {
                let grace = { *shutdown_rx.borrow() }.unwrap_or(FALLBACK_GRACE);
                conn.as_mut().graceful_shutdown();
                match tokio::time::timeout(grace, conn.as_mut()).await {
                    Ok(res) => res,
                    Err(_) => {
                        state.connections.record_forced();
                        logger::log_forced_close(&peer_addr);
                        Ok(())
                    }
                }
            }
        }
    };

    match result {
        Ok(()) => {}
        Err(e) if e.is_parse() => logger::log_protocol_error(&peer_addr, &e),
        Err(e) if e.is_timeout() => {
            logger::log_warning(&format!("Connection from {peer_addr} idle-timed out"));
        }
        Err(e) => logger::log_connection_error(&e),
    }
}
