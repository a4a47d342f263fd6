//! Canned protocol-level responses.
//!
//! Anything short of a fatal startup failure still yields a well-formed
//! response to the client; these builders cover the statuses the core
//! emits itself.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, SERVER};
use hyper::Response;

/// Build 400 Bad Request response (malformed request bytes).
/// The connection is closed afterwards; a stream we could not parse is
/// not worth resynchronizing.
pub fn build_400_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(400)
        .header("Content-Type", "text/plain")
        .header("Connection", "close")
        .body(Full::new(Bytes::from("400 Bad Request")))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("400 Bad Request")))
        })
}

/// Build 413 Payload Too Large response (request exceeded the body cap).
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .header("Connection", "close")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 500 Internal Server Error response (handler failure).
pub fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("500 Internal Server Error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::from("500 Internal Server Error")))
        })
}

/// Build 504 Gateway Timeout response (handler deadline exceeded).
pub fn build_504_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(504)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("504 Gateway Timeout")))
        .unwrap_or_else(|e| {
            log_build_error("504", &e);
            Response::new(Full::new(Bytes::from("504 Gateway Timeout")))
        })
}

/// Stamp the configured `Server` header unless the application already
/// set one.
pub fn stamp_server_header(resp: &mut Response<Full<Bytes>>, server_name: &str) {
    if resp.headers().contains_key(SERVER) {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(server_name) {
        resp.headers_mut().insert(SERVER, value);
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_responses_close_the_connection() {
        for resp in [build_400_response(), build_413_response()] {
            assert_eq!(resp.headers().get("Connection").unwrap(), "close");
        }
    }

    #[test]
    fn status_codes_match() {
        assert_eq!(build_400_response().status(), 400);
        assert_eq!(build_413_response().status(), 413);
        assert_eq!(build_500_response().status(), 500);
        assert_eq!(build_504_response().status(), 504);
    }

    #[test]
    fn server_header_is_stamped_once() {
        let mut resp = build_500_response();
        stamp_server_header(&mut resp, "frontdoor/test");
        assert_eq!(resp.headers().get(SERVER).unwrap(), "frontdoor/test");

        // An existing header wins; the application knows better.
        stamp_server_header(&mut resp, "other/name");
        assert_eq!(resp.headers().get(SERVER).unwrap(), "frontdoor/test");
    }
}
