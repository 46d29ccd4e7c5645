use std::sync::Mutex;

use tracing::debug;

use crate::ports::PortNumber;

/// Receives a signal when the neighbor on a port is replaced by another one.
///
/// Called from the receive path with no agent lock held.
pub trait AlarmSink: Send + Sync {
    fn peer_changed(&self, port: PortNumber);
}

/// Drops every alarm.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAlarms;

impl AlarmSink for NoAlarms {
    fn peer_changed(&self, port: PortNumber) {
        debug!(%port, "peer change alarm ignored");
    }
}

/// Keeps every alarm in memory.
#[derive(Debug, Default)]
pub struct RecordingAlarms {
    events: Mutex<Vec<PortNumber>>,
}

impl RecordingAlarms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the alarms raised so far.
    pub fn take(&self) -> Vec<PortNumber> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PortNumber>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AlarmSink for RecordingAlarms {
    fn peer_changed(&self, port: PortNumber) {
        self.lock().push(port);
    }
}
