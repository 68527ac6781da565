//! Mock transport for testing

use super::Transport;
use crate::error::Result;
use std::sync::{Arc, Mutex};

/// Mock transport that records each written frame
#[derive(Clone)]
pub struct MockTransport {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        MockTransport {
            frames: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get all written frames, one entry per write call
    pub fn written_frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().unwrap().clone()
    }

    /// Clear recorded frames
    pub fn clear(&self) {
        self.frames.lock().unwrap().clear();
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.frames.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}
