use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use frontdoor::server::signal;
use frontdoor::{
    logger, AppHandler, AppRequest, AppResponse, Config, HandlerError, Server, ServerError,
    StopOutcome,
};

fn main() -> ExitCode {
    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[ERROR] {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::init(&cfg) {
        eprintln!("[ERROR] Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = match runtime_builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            logger::log_error(&format!("Failed to build runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cfg)) {
        Ok(StopOutcome::Graceful) => ExitCode::SUCCESS,
        Ok(StopOutcome::Forced) => ExitCode::FAILURE,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: Config) -> Result<StopOutcome, ServerError> {
    let shutdown_timeout = Duration::from_secs(cfg.server.shutdown_timeout);

    let handler: Arc<dyn AppHandler> = Arc::new(echo_app);
    let server = Arc::new(Server::start(cfg.clone(), handler)?);
    logger::log_server_start(&server.local_addr(), &cfg);

    let serve_task = {
        let server = Arc::clone(&server);
        tokio::spawn(async move { server.serve().await })
    };

    signal::wait_for_termination().await;
    let outcome = server.stop(shutdown_timeout).await;
    let _ = serve_task.await;

    Ok(outcome)
}

/// Placeholder application: echoes the request line back. Stands in for
/// the real application object until one is wired in.
async fn echo_app(req: AppRequest) -> Result<AppResponse, HandlerError> {
    let body = format!("{} {}", req.method(), req.uri().path());
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(body)))
        .map_err(|e| HandlerError::new(e.to_string()))
}
