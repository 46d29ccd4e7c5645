use std::sync::Mutex;

use bytes::Bytes;
use tracing::trace;

use crate::error::{Result, TransportError};
use crate::ethernet::{ETH_HEADER_SIZE, MAX_ETH_PAYLOAD};

/// Hands a complete Ethernet frame to the link of one local port.
///
/// Ports are numbered `1..=N`. Ownership of `frame` moves to the
/// implementation; the caller never touches it again. Implementations must
/// not block on the network: a full queue is reported as an error.
pub trait PortTransmitter: Send + Sync {
    /// Transmit `frame` on local port `port`.
    fn transmit(&self, port: u16, frame: Bytes) -> Result<()>;
}

/// Transmitter that records every frame in memory.
///
/// Used by tests and by simulations that wire two agents together.
#[derive(Debug, Default)]
pub struct CaptureTransmitter {
    frames: Mutex<Vec<(u16, Bytes)>>,
    port_count: Option<u16>,
}

impl CaptureTransmitter {
    /// Capture frames for any port number.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture frames, rejecting ports outside `1..=port_count`.
    pub fn with_port_count(port_count: u16) -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
            port_count: Some(port_count),
        }
    }

    /// Remove and return all captured frames in transmit order.
    pub fn take(&self) -> Vec<(u16, Bytes)> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of frames captured so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Most recent frame sent on `port`.
    pub fn last_for(&self, port: u16) -> Option<Bytes> {
        self.lock()
            .iter()
            .rev()
            .find(|(p, _)| *p == port)
            .map(|(_, frame)| frame.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u16, Bytes)>> {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PortTransmitter for CaptureTransmitter {
    fn transmit(&self, port: u16, frame: Bytes) -> Result<()> {
        if port == 0 || self.port_count.is_some_and(|count| port > count) {
            return Err(TransportError::NoSuchPort(port));
        }
        let max = ETH_HEADER_SIZE + MAX_ETH_PAYLOAD;
        if frame.len() > max {
            return Err(TransportError::FrameTooLarge {
                len: frame.len(),
                max,
            });
        }
        trace!(port, len = frame.len(), "captured frame");
        self.lock().push((port, frame));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_in_order() {
        let tx = CaptureTransmitter::new();
        tx.transmit(1, Bytes::from_static(b"one")).unwrap();
        tx.transmit(2, Bytes::from_static(b"two")).unwrap();
        tx.transmit(1, Bytes::from_static(b"three")).unwrap();

        assert_eq!(tx.len(), 3);
        assert_eq!(tx.last_for(1).unwrap().as_ref(), b"three");
        assert_eq!(tx.last_for(2).unwrap().as_ref(), b"two");
        assert!(tx.last_for(3).is_none());

        let frames = tx.take();
        assert_eq!(frames[0].0, 1);
        assert_eq!(frames[1].0, 2);
        assert!(tx.is_empty());
    }

    #[test]
    fn rejects_unknown_port() {
        let tx = CaptureTransmitter::with_port_count(2);
        assert!(matches!(
            tx.transmit(3, Bytes::new()),
            Err(TransportError::NoSuchPort(3))
        ));
        assert!(matches!(
            tx.transmit(0, Bytes::new()),
            Err(TransportError::NoSuchPort(0))
        ));
        assert!(tx.transmit(2, Bytes::new()).is_ok());
    }

    #[test]
    fn rejects_oversized_frame() {
        let tx = CaptureTransmitter::new();
        let frame = Bytes::from(vec![0u8; ETH_HEADER_SIZE + MAX_ETH_PAYLOAD + 1]);
        assert!(matches!(
            tx.transmit(1, frame),
            Err(TransportError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn usable_as_trait_object() {
        let tx: std::sync::Arc<dyn PortTransmitter> =
            std::sync::Arc::new(CaptureTransmitter::new());
        tx.transmit(1, Bytes::from_static(b"x")).unwrap();
    }
}
