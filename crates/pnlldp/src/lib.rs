//! LLDP neighbor discovery for PROFINET-style fieldbus devices.
//!
//! pnlldp advertises a device on every Ethernet port and tracks the one
//! neighbor directly attached to each port: its identity, management
//! address, signal delays and link status.
//!
//! # Crate Structure
//!
//! - [`transport`]: raw frame boundary (`PortTransmitter`, Linux packet sockets)
//! - [`tlv`]: LLDP TLV encoding and decoding
//! - [`peer`]: the LLDP agent: builder, parser, peer store, timer (behind `peer` feature)
//! - [`mib`]: LLDP-MIB value formatting (behind `mib` feature)

/// Re-export transport types.
pub mod transport {
    pub use pnlldp_transport::*;
}

/// Re-export TLV types.
pub mod tlv {
    pub use pnlldp_tlv::*;
}

/// Re-export agent types (requires `peer` feature).
#[cfg(feature = "peer")]
pub mod peer {
    pub use pnlldp_peer::*;
}

/// Re-export MIB formatting (requires `mib` feature).
#[cfg(feature = "mib")]
pub mod mib {
    pub use pnlldp_mib::*;
}
