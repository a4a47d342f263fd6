// Listening socket acquisition.

use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use crate::error::ServerError;

const ACCEPT_BACKLOG: i32 = 128;

/// Bind `addr` and return a non-blocking listener ready for the accept
/// loop. All socket-level failures map to [`ServerError::Bind`].
///
/// `SO_REUSEADDR` keeps restarts from tripping over sockets lingering in
/// TIME_WAIT; `SO_REUSEPORT` lets operators run several front-door
/// processes sharing one port for load-balanced accepts.
pub(crate) fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    create_listener(addr).map_err(|source| ServerError::Bind { addr, source })
}

fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(ACCEPT_BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_an_ephemeral_port() {
        let listener = bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
    }
}
