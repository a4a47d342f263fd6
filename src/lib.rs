//! A minimal HTTP front door.
//!
//! Turns a process into a correctly behaving network server: binds a
//! TCP listener, accepts concurrent connections, and dispatches every
//! well-formed request to one externally supplied application handler.
//! Routing, middleware, templating and persistence are the handler's
//! business, not this crate's.
//!
//! ```no_run
//! use std::sync::Arc;
//! use frontdoor::{AppHandler, AppRequest, AppResponse, Config, HandlerError, Server};
//! use http_body_util::Full;
//! use hyper::body::Bytes;
//! use hyper::Response;
//!
//! async fn app(_req: AppRequest) -> Result<AppResponse, HandlerError> {
//!     Ok(Response::new(Full::new(Bytes::from("hello"))))
//! }
//!
//! # async fn run() -> Result<(), frontdoor::ServerError> {
//! let handler: Arc<dyn AppHandler> = Arc::new(app);
//! let server = Server::start(Config::default(), handler)?;
//! server.serve().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use error::{HandlerError, ServerError};
pub use handler::{AppHandler, AppRequest, AppResponse, HandlerFuture};
pub use server::{Server, StopOutcome};
