/// Errors that can occur when handing frames to or from the link layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open a raw socket on the named interface.
    #[error("failed to open {interface}: {source}")]
    Open {
        interface: String,
        source: std::io::Error,
    },

    /// The named interface does not exist.
    #[error("interface not found: {0}")]
    InterfaceNotFound(String),

    /// No transmit path is registered for the local port.
    #[error("no link for local port {0}")]
    NoSuchPort(u16),

    /// The frame does not fit into a single Ethernet frame.
    #[error("frame too large ({len} bytes, max {max})")]
    FrameTooLarge { len: usize, max: usize },

    /// A textual MAC address could not be parsed.
    #[error("invalid MAC address: {0:?}")]
    InvalidMac(String),

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
