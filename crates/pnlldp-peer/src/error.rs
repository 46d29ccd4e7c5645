use std::path::PathBuf;

use pnlldp_tlv::TlvError;

/// Errors that can occur in LLDP agent operations.
#[derive(Debug, thiserror::Error)]
pub enum LldpError {
    /// TLV-level error.
    #[error("tlv error: {0}")]
    Tlv(#[from] TlvError),

    /// Link-level error while handing a frame over.
    #[error("transport error: {0}")]
    Transport(#[from] pnlldp_transport::TransportError),

    /// The port number is outside `1..=N`.
    #[error("local port {0} does not exist")]
    InvalidPort(u16),

    /// No frame has been received on the port since start or invalidation.
    #[error("no peer data on local port {0}")]
    NoPeerData(u16),

    /// The outgoing LLDPDU does not fit the frame budget; nothing was sent.
    #[error("LLDPDU for port {port} exceeds the frame budget: {source}")]
    BuildOverflow {
        port: u16,
        #[source]
        source: TlvError,
    },

    /// The alias name does not fit the caller's buffer.
    #[error("alias buffer too small ({needed} bytes needed, capacity {capacity})")]
    BufferTooSmall { needed: usize, capacity: usize },

    /// An alias name cannot be formed from the given identifiers.
    #[error("invalid alias input: {0}")]
    InvalidAlias(&'static str),

    /// The configuration violates a constraint.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LldpError>;
