// Per-request dispatch.
// One cycle: bound the body, invoke the application handler exactly
// once, map every outcome onto a response, emit the access log line.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::{Request, Response, Version};

use crate::http;
use crate::logger;
use crate::logger::AccessLogEntry;

use super::ServerState;

pub(crate) async fn handle_request(
    req: Request<Incoming>,
    state: &Arc<ServerState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.referer = header_str(&req, "referer");
    entry.user_agent = header_str(&req, "user-agent");

    let mut response = run_cycle(req, state).await;
    http::stamp_server_header(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes =
            usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Buffer the request body under the size cap, then hand the request to
/// the handler. Exactly one handler invocation per request; a request
/// rejected here never reaches the handler at all.
async fn run_cycle(req: Request<Incoming>, state: &Arc<ServerState>) -> Response<Full<Bytes>> {
    let max_body = state.config.http.max_body_size;

    // Reject on the declared length before buffering anything.
    if let Some(declared) = declared_body_size(&req) {
        if declared > max_body {
            logger::log_warning(&format!(
                "Request body too large: {declared} bytes declared (max: {max_body})"
            ));
            return http::build_413_response();
        }
    }

    // The cap also holds for chunked bodies that never declared a length.
    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body).unwrap_or(usize::MAX);
    let buffered = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!(
                "Request body exceeded {max_body} bytes, rejecting"
            ));
            return http::build_413_response();
        }
        Err(err) => {
            logger::log_warning(&format!("Failed to read request body: {err}"));
            return http::build_400_response();
        }
    };

    let app_req = Request::from_parts(parts, buffered);

    match state.config.performance.handler_timeout {
        Some(deadline) => {
            let limit = Duration::from_secs(deadline);
            match tokio::time::timeout(limit, state.handler.handle(app_req)).await {
                Ok(Ok(resp)) => resp,
                Ok(Err(err)) => {
                    logger::log_handler_error(&err);
                    http::build_500_response()
                }
                Err(_) => {
                    logger::log_handler_timeout(deadline);
                    http::build_504_response()
                }
            }
        }
        None => match state.handler.handle(app_req).await {
            Ok(resp) => resp,
            Err(err) => {
                logger::log_handler_error(&err);
                http::build_500_response()
            }
        },
    }
}

/// Content-Length as declared by the client, if parseable.
fn declared_body_size(req: &Request<Incoming>) -> Option<u64> {
    req.headers()
        .get(hyper::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn header_str(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_strings() {
        assert_eq!(version_str(Version::HTTP_10), "1.0");
        assert_eq!(version_str(Version::HTTP_11), "1.1");
        assert_eq!(version_str(Version::HTTP_2), "2");
    }
}
