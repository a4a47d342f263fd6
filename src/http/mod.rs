//! HTTP protocol-level helpers.
//!
//! Responses the front door produces on its own authority, without
//! consulting the application handler, plus response stamping.

pub mod response;

pub use response::{
    build_400_response, build_413_response, build_500_response, build_504_response,
    stamp_server_header,
};
