//! Mock actuator for testing and hardware-free runs

use crate::devices::Actuator;
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex};

/// Mock actuator that records every applied duty
///
/// Clones share the same recording, so a test can keep a handle while the
/// actuation loop owns the boxed instance. Failures can be injected to
/// exercise the loop's fault tolerance.
#[derive(Clone)]
pub struct MockActuator {
    inner: Arc<Mutex<MockActuatorState>>,
}

#[derive(Debug, Default)]
struct MockActuatorState {
    applied: Vec<f64>,
    fail_remaining: u32,
}

impl MockActuator {
    /// Create new mock actuator
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockActuatorState::default())),
        }
    }

    /// All duties applied so far, in order
    pub fn applied(&self) -> Vec<f64> {
        self.inner.lock().unwrap().applied.clone()
    }

    /// Most recently applied duty
    pub fn last_applied(&self) -> Option<f64> {
        self.inner.lock().unwrap().applied.last().copied()
    }

    /// Number of apply calls so far
    pub fn apply_count(&self) -> usize {
        self.inner.lock().unwrap().applied.len()
    }

    /// Make the next `count` apply calls fail
    pub fn fail_next(&self, count: u32) {
        self.inner.lock().unwrap().fail_remaining = count;
    }

    /// Clear the recording
    pub fn clear(&self) {
        self.inner.lock().unwrap().applied.clear();
    }
}

impl Default for MockActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl Actuator for MockActuator {
    fn apply(&mut self, duty: f64) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        if state.fail_remaining > 0 {
            state.fail_remaining -= 1;
            return Err(Error::Other("injected actuator failure".to_string()));
        }
        state.applied.push(duty);
        Ok(())
    }
}
