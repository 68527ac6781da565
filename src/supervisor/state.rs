//! Shared actuation state
//!
//! One mutex guards the `(armed, commanded_duty)` pair so the two fields are
//! always observed together. Every operation here is a short critical
//! section with no I/O inside it; the actuation loop and any number of
//! client sessions contend on it without stalling each other.

use parking_lot::Mutex;

/// Why a duty write was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// Supervisor is disarmed; duty commands are ignored until `arm`
    NotArmed,
}

#[derive(Debug, Clone, Copy)]
struct ActuationState {
    armed: bool,
    commanded_duty: f64,
}

/// The authoritative supervisor state, created once at startup
///
/// Stored duty values are NOT clamped here: the acknowledgment sent back to
/// the client echoes exactly what was requested, and the safety clamp is
/// applied by the actuation loop on every read.
pub struct SupervisorState {
    inner: Mutex<ActuationState>,
}

impl SupervisorState {
    /// New state: disarmed, zero duty
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ActuationState {
                armed: false,
                commanded_duty: 0.0,
            }),
        }
    }

    /// Allow nonzero output. Leaves the commanded duty untouched.
    pub fn arm(&self) {
        {
            let mut state = self.inner.lock();
            state.armed = true;
        }
        log::info!("Supervisor armed");
    }

    /// Safe idle: disarm and zero the commanded duty in one step
    pub fn disarm(&self) {
        {
            let mut state = self.inner.lock();
            state.armed = false;
            state.commanded_duty = 0.0;
        }
        log::info!("Supervisor disarmed, duty reset to 0");
    }

    /// Same transition as [`disarm`](Self::disarm); invoked on stop commands,
    /// fatal errors, and shutdown. The zeroed state is visible to the
    /// actuation loop's next snapshot before this returns.
    pub fn stop(&self) {
        {
            let mut state = self.inner.lock();
            state.armed = false;
            state.commanded_duty = 0.0;
        }
        log::info!("Supervisor stopped, duty reset to 0");
    }

    /// Store a commanded duty value, unclamped
    ///
    /// Returns the stored value for acknowledgment, or [`Rejected::NotArmed`]
    /// without touching the state when disarmed.
    pub fn set_duty(&self, duty: f64) -> Result<f64, Rejected> {
        {
            let mut state = self.inner.lock();
            if !state.armed {
                return Err(Rejected::NotArmed);
            }
            state.commanded_duty = duty;
        }
        log::debug!("Commanded duty set to {:.4}", duty);
        Ok(duty)
    }

    /// One atomic read of the `(armed, commanded_duty)` pair
    pub fn snapshot(&self) -> (bool, f64) {
        let state = self.inner.lock();
        (state.armed, state.commanded_duty)
    }
}

impl Default for SupervisorState {
    fn default() -> Self {
        Self::new()
    }
}
