use pnlldp_peer::LldpError;

/// Errors returned by MIB getters.
#[derive(Debug, thiserror::Error)]
pub enum MibError {
    /// Nothing has been received from a neighbor on this port.
    #[error("no peer data on local port {port}")]
    NoData { port: u16 },

    #[error("local port {0} does not exist")]
    InvalidPort(u16),

    /// The address does not fit the MIB's OCTET STRING size.
    #[error("management address is {len} bytes, max {max}")]
    AddressTooLong { len: usize, max: usize },

    #[error("lldp query failed: {0}")]
    Query(LldpError),
}

impl From<LldpError> for MibError {
    fn from(err: LldpError) -> Self {
        match err {
            LldpError::NoPeerData(port) => MibError::NoData { port },
            LldpError::InvalidPort(port) => MibError::InvalidPort(port),
            other => MibError::Query(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, MibError>;
