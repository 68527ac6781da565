//! VESC motor controller driver
//!
//! Open-loop duty control only: every [`Actuator::apply`] call becomes one
//! COMM_SET_DUTY frame on the serial link. The VESC's own communication
//! timeout stops the motor if frames cease, which the actuation loop's
//! fixed cadence keeps satisfied while the daemon is alive.

mod protocol;

use crate::devices::Actuator;
use crate::error::Result;
use crate::transport::{SerialTransport, Transport};
pub use protocol::VescCommand;

/// VESC driver over a write-only transport
pub struct VescActuator {
    transport: Box<dyn Transport>,
}

impl VescActuator {
    /// Open the VESC on a serial port
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let transport = SerialTransport::open(path, baud_rate)?;
        log::info!("VESC: opened on {}", path);
        Ok(Self::with_transport(Box::new(transport)))
    }

    /// Build over an existing transport
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        VescActuator { transport }
    }
}

impl Actuator for VescActuator {
    fn apply(&mut self, duty: f64) -> Result<()> {
        let packet = VescCommand::SetDuty(duty).encode();
        self.transport.write(&packet)?;
        self.transport.flush()?;
        Ok(())
    }
}
