//! TCP command server
//!
//! Accepts client connections and hands each one to a dedicated
//! [`session::ClientSession`] thread. The listener polls non-blocking so the
//! global running flag is honored within ~10 ms; sessions themselves block
//! on their own sockets.

pub mod protocol;
pub mod session;

use crate::config::NetworkConfig;
use crate::error::Result;
use crate::supervisor::SupervisorState;
use session::ClientSession;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Accept-loop poll interval while idle
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP command server with a bounded session count
pub struct CommandServer {
    listener: TcpListener,
    state: Arc<SupervisorState>,
    running: Arc<AtomicBool>,
    active_sessions: Arc<AtomicUsize>,
    max_sessions: usize,
    stop_on_disconnect: bool,
}

impl CommandServer {
    /// Bind the listener
    pub fn bind(
        config: &NetworkConfig,
        state: Arc<SupervisorState>,
        running: Arc<AtomicBool>,
    ) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind_address)?;
        listener.set_nonblocking(true)?;

        log::info!("Command server listening on {}", config.bind_address);

        Ok(Self {
            listener,
            state,
            running,
            active_sessions: Arc::new(AtomicUsize::new(0)),
            max_sessions: config.max_sessions,
            stop_on_disconnect: config.stop_on_disconnect,
        })
    }

    /// Actual bound address (useful when binding to port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the running flag drops
    pub fn run(&self) -> Result<()> {
        while self.running.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => self.accept_client(stream, addr),
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    log::error!("Accept error: {}", e);
                }
            }
        }

        log::info!("Command server stopped");
        Ok(())
    }

    fn accept_client(&self, stream: std::net::TcpStream, addr: SocketAddr) {
        // Bound the session count so a connection flood cannot grow threads
        // without limit. Rejected clients are closed before the greeting.
        let active = self.active_sessions.load(Ordering::Relaxed);
        if active >= self.max_sessions {
            log::warn!(
                "Rejecting connection from {}: session limit reached ({})",
                addr,
                self.max_sessions
            );
            let _ = stream.shutdown(std::net::Shutdown::Both);
            return;
        }

        // Accepted sockets inherit non-blocking from the listener on some
        // platforms; sessions want plain blocking reads.
        if let Err(e) = stream.set_nonblocking(false) {
            log::error!("Failed to set client socket blocking: {}", e);
            let _ = stream.shutdown(std::net::Shutdown::Both);
            return;
        }

        self.active_sessions.fetch_add(1, Ordering::Relaxed);

        let session = ClientSession::new(
            stream,
            addr,
            Arc::clone(&self.state),
            self.stop_on_disconnect,
        );
        let active_sessions = Arc::clone(&self.active_sessions);

        let spawned = thread::Builder::new()
            .name(format!("session-{}", addr))
            .spawn(move || {
                if let Err(e) = session.run() {
                    log::debug!("Session {} ended with error: {}", addr, e);
                }
                active_sessions.fetch_sub(1, Ordering::Relaxed);
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn session thread for {}: {}", addr, e);
            self.active_sessions.fetch_sub(1, Ordering::Relaxed);
        }
    }
}
