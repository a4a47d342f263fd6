//! Logger module
//!
//! Server lifecycle, connection and access logging through one global
//! writer (stdout/stderr or files, per configuration).

mod format;
mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use crate::config::Config;

/// Initialize the logger with configuration.
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Front door started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    write_info(&format!(
        "Max request body: {} bytes",
        config.http.max_body_size
    ));
    write_info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_rejected(active: usize, max: u64) {
    write_error(&format!(
        "[WARN] Max connections reached: {active}/{max}. Connection rejected."
    ));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_protocol_error(peer_addr: &SocketAddr, err: &impl std::fmt::Display) {
    write_error(&format!("[WARN] Malformed request from {peer_addr}: {err}"));
}

pub fn log_handler_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Handler failed: {err}"));
}

pub fn log_handler_timeout(secs: u64) {
    write_error(&format!("[WARN] Handler exceeded {secs}s deadline"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_signal(name: &str) {
    write_info(&format!("[Signal] {name} received, shutting down"));
}

pub fn log_shutdown_requested(active: usize) {
    write_info(&format!(
        "[Shutdown] Stop requested, {active} connection(s) in flight"
    ));
}

pub fn log_forced_close(peer_addr: &SocketAddr) {
    write_error(&format!(
        "[WARN] Grace period elapsed, closing connection from {peer_addr}"
    ));
}

pub fn log_shutdown_complete(graceful: bool) {
    if graceful {
        write_info("[Shutdown] All connections drained");
    } else {
        write_error("[WARN] Shutdown forced, remaining connections were closed");
    }
}

/// Write one formatted access log line.
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
