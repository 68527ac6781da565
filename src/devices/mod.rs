//! Actuator drivers

pub mod mock;
pub mod vesc;

use crate::config::ActuatorConfig;
use crate::error::{Error, Result};
pub use mock::MockActuator;
pub use vesc::VescActuator;

/// The one capability the supervisor needs from hardware
///
/// `duty` is already clamped by the caller; the actuation loop is the only
/// caller. `apply(0.0)` must always be a safe request.
pub trait Actuator: Send {
    /// Push one duty value to the hardware
    fn apply(&mut self, duty: f64) -> Result<()>;
}

/// Create an actuator driver based on configuration
pub fn create_actuator(config: &ActuatorConfig) -> Result<Box<dyn Actuator>> {
    match config.driver.as_str() {
        "vesc" => {
            let actuator = VescActuator::open(&config.port, config.baud_rate)?;
            Ok(Box::new(actuator))
        }
        "mock" => Ok(Box::new(MockActuator::new())),
        other => Err(Error::UnknownDriver(other.to_string())),
    }
}
