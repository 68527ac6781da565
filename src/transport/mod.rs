//! Transport layer for actuator I/O
//!
//! The supervisor is open-loop: it only ever pushes frames toward the
//! hardware, so the transport is write-only.

use crate::error::Result;

mod mock;
mod serial;

pub use mock::MockTransport;
pub use serial::SerialTransport;

/// Write-side transport for device communication
pub trait Transport: Send {
    /// Write one complete frame
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Flush pending writes (blocking until handed to the driver)
    fn flush(&mut self) -> Result<()>;
}
