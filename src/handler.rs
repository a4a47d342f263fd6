//! The application handler capability.
//!
//! The front door owns no business logic. Every well-formed request it
//! reads is handed to exactly one externally supplied [`AppHandler`];
//! the server's only obligation is to map the outcome (response, error,
//! deadline exceeded) onto an HTTP status.

use std::future::Future;
use std::pin::Pin;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

use crate::error::HandlerError;

/// Request view handed to the application: the parsed head plus the
/// fully buffered body. Buffering is bounded by `http.max_body_size`
/// before the handler ever sees the request.
pub type AppRequest = Request<Bytes>;

/// Response produced by the application.
pub type AppResponse = Response<Full<Bytes>>;

/// Boxed future returned by [`AppHandler::handle`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<AppResponse, HandlerError>> + Send>>;

/// The single capability the server depends on.
///
/// Implementations are shared behind an `Arc` and called concurrently
/// from many connection tasks; they must not rely on exclusive access.
pub trait AppHandler: Send + Sync + 'static {
    fn handle(&self, req: AppRequest) -> HandlerFuture;
}

/// Any async closure of the right shape is a handler.
impl<F, Fut> AppHandler for F
where
    F: Fn(AppRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<AppResponse, HandlerError>> + Send + 'static,
{
    fn handle(&self, req: AppRequest) -> HandlerFuture {
        Box::pin(self(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn hello(_req: AppRequest) -> Result<AppResponse, HandlerError> {
        Ok(Response::new(Full::new(Bytes::from("hello"))))
    }

    #[tokio::test]
    async fn async_fn_is_a_handler() {
        let handler: Arc<dyn AppHandler> = Arc::new(hello);
        let req = Request::builder().body(Bytes::new()).unwrap();
        let resp = handler.handle(req).await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn closure_is_a_handler() {
        let handler: Arc<dyn AppHandler> = Arc::new(|req: AppRequest| async move {
            let path = req.uri().path().to_string();
            Ok(Response::new(Full::new(Bytes::from(path))))
        });
        let req = Request::builder()
            .uri("/ping")
            .body(Bytes::new())
            .unwrap();
        let resp = handler.handle(req).await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn handler_errors_propagate() {
        let handler: Arc<dyn AppHandler> =
            Arc::new(|_req: AppRequest| async { Err(HandlerError::new("nope")) });
        let req = Request::builder().body(Bytes::new()).unwrap();
        let err = handler.handle(req).await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
