//! RakshaIO - Safety supervisor daemon for VESC motor actuators
//!
//! A remote client commands a single motor over TCP while a local supervisor
//! enforces hard limits on what the actuator ever receives, regardless of
//! how the client misbehaves. Two halves compose around one shared state
//! cell:
//!
//! - Command ingestion: one thread per client, newline-delimited text
//!   commands, strict request/response
//! - Actuation loop: one fixed-cadence thread, the only caller of the
//!   actuator, clamping every output and failing safe toward zero
//!
//! ## Safety model
//!
//! - Commanded values are stored unclamped (the ack echoes the request);
//!   the clamp is enforced at the single point that talks to hardware
//! - Disarmed means zero output, whatever the stored duty says
//! - Shutdown always ends with one neutral `apply(0.0)` cycle

pub mod config;
pub mod devices;
pub mod error;
pub mod server;
pub mod supervisor;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
