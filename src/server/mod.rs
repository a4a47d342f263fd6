// Server module entry point
// The listener/dispatcher core: bind, accept, dispatch, stop.

mod accept;
mod conn;
mod dispatch;
mod listener;
mod shutdown;
pub mod signal;

pub use shutdown::StopOutcome;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::ServerError;
use crate::handler::AppHandler;
use crate::logger;

use shutdown::{ConnectionGauge, ShutdownSignal};

/// Settling time granted on top of the stop grace period so connection
/// tasks that force-closed at the deadline can still unwind.
const DRAIN_SLACK: Duration = Duration::from_millis(250);

/// Shared state every handling unit sees. The handler reference is the
/// only externally supplied piece and is never mutated.
pub(crate) struct ServerState {
    pub config: Config,
    pub handler: Arc<dyn AppHandler>,
    pub connections: ConnectionGauge,
    pub shutdown: ShutdownSignal,
}

/// The bound front door.
///
/// [`Server::start`] binds, [`Server::serve`] accepts until
/// [`Server::stop`] is called. The listening socket is owned here and
/// released when the server is dropped, on every path.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<ServerState>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Validate the configuration, bind the listening socket and return
    /// a server ready to accept.
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`ServerError::InvalidConfig`] / [`ServerError::Address`] before
    /// touching the network and [`ServerError::Bind`] if the port is
    /// taken.
    pub fn start(config: Config, handler: Arc<dyn AppHandler>) -> Result<Self, ServerError> {
        config.validate()?;
        let addr = config.socket_addr()?;
        let listener = listener::bind(addr)?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let state = Arc::new(ServerState {
            config,
            handler,
            connections: ConnectionGauge::new(),
            shutdown: ShutdownSignal::new(),
        });

        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    /// The address actually bound; differs from the configured one when
    /// port 0 requested an ephemeral port.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the accept loop until a stop request arrives. Each accepted
    /// connection runs as its own task; a slow client never blocks the
    /// loop.
    pub async fn serve(&self) {
        accept::run(&self.listener, &self.state).await;
    }

    /// Request graceful shutdown.
    ///
    /// New connections stop being accepted immediately; in-flight
    /// handling units get `timeout` to finish their current cycle, then
    /// are closed forcibly. Returns [`StopOutcome::Graceful`] only if
    /// nothing had to be forced.
    pub async fn stop(&self, timeout: Duration) -> StopOutcome {
        logger::log_shutdown_requested(self.state.connections.active());
        self.state.shutdown.trigger(timeout);

        let drained = self
            .state
            .connections
            .wait_drained(timeout + DRAIN_SLACK)
            .await;
        let graceful = drained && self.state.connections.forced() == 0;
        logger::log_shutdown_complete(graceful);

        if graceful {
            StopOutcome::Graceful
        } else {
            StopOutcome::Forced
        }
    }
}
