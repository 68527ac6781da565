//! Per-connection command session
//!
//! One session per accepted client, running on its own thread. The loop is
//! strictly request/response: read one line, mutate the supervisor state (or
//! reject), write exactly one acknowledgment, repeat. Blocking on the socket
//! is fine here; the actuation loop never waits on us.

use crate::server::protocol::{self, Command, GREETING, Reply};
use crate::supervisor::SupervisorState;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

/// One client connection's command loop
pub struct ClientSession {
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<SupervisorState>,
    stop_on_disconnect: bool,
}

impl ClientSession {
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        state: Arc<SupervisorState>,
        stop_on_disconnect: bool,
    ) -> Self {
        Self {
            stream,
            addr,
            state,
            stop_on_disconnect,
        }
    }

    /// Run the session until EOF or a connection error
    pub fn run(mut self) -> crate::error::Result<()> {
        log::info!("Client connected: {}", self.addr);

        let result = self.serve();

        // Session teardown only ever affects this connection, unless the
        // deployment opted into the disconnect-stops-motor policy.
        if self.stop_on_disconnect {
            log::info!("Client {} gone, stop_on_disconnect forcing safe idle", self.addr);
            self.state.stop();
        }

        let _ = self.stream.shutdown(std::net::Shutdown::Both);
        log::info!("Client disconnected: {}", self.addr);

        result
    }

    fn serve(&mut self) -> crate::error::Result<()> {
        writeln!(self.stream, "{}", GREETING)?;
        self.stream.flush()?;

        let mut reader = BufReader::new(self.stream.try_clone()?);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => return Ok(()), // EOF, clean close
                Ok(_) => {
                    // Clients are not trusted to send valid UTF-8
                    let line = String::from_utf8_lossy(&buf);
                    if let Some(reply) = self.handle_line(&line) {
                        writeln!(self.stream, "{}", reply)?;
                        self.stream.flush()?;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Parse and dispatch one line; `None` means no reply (blank line)
    fn handle_line(&self, line: &str) -> Option<Reply> {
        let command = match protocol::parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("Client {} sent bad line {:?}: {:?}", self.addr, line.trim(), e);
                return Some(Reply::from(e));
            }
        };

        log::debug!("Client {} command: {:?}", self.addr, command);
        Some(dispatch(&self.state, command))
    }
}

/// Apply one command to the supervisor state and pick the reply
fn dispatch(state: &SupervisorState, command: Command) -> Reply {
    match command {
        Command::Arm => {
            state.arm();
            Reply::Enabled
        }
        Command::Disarm => {
            state.disarm();
            Reply::Disabled
        }
        Command::Stop => {
            state.stop();
            Reply::Stopped
        }
        Command::SetDuty(duty) => match state.set_duty(duty) {
            Ok(stored) => Reply::Duty(stored),
            Err(_) => Reply::NotEnabled,
        },
        Command::Ping => Reply::Pong,
        Command::Status => {
            let (armed, duty) = state.snapshot();
            Reply::Status(armed, duty)
        }
    }
}
