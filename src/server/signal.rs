// Signal handling.
//
// SIGTERM and SIGINT both resolve to one graceful stop; the grace
// period comes from `server.shutdown_timeout`.

use crate::logger;

/// Wait until the process is asked to terminate (Unix).
///
/// | Signal  | Action        |
/// |---------|---------------|
/// | SIGTERM | Graceful stop |
/// | SIGINT  | Graceful stop (Ctrl+C) |
#[cfg(unix)]
pub async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
    let mut sigint =
        signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => logger::log_signal("SIGTERM"),
        _ = sigint.recv() => logger::log_signal("SIGINT"),
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_termination() {
    if tokio::signal::ctrl_c().await.is_ok() {
        logger::log_signal("Ctrl+C");
    }
}
