//! Raw Ethernet frame boundary for the LLDP agent.
//!
//! The agent never owns a socket. It hands complete frames to a
//! [`PortTransmitter`] and receives frames from whatever the surrounding
//! stack reads them with:
//! - [`CaptureTransmitter`] keeps frames in memory (tests, simulations)
//! - [`PacketSocket`] sends and receives on a Linux `AF_PACKET` socket
//!
//! This is the lowest layer of pnlldp. The Ethernet constants and
//! [`MacAddr`] used by every other crate live here too.

pub mod error;
pub mod ethernet;
pub mod traits;

#[cfg(target_os = "linux")]
pub mod packet;

pub use error::{Result, TransportError};
pub use ethernet::{
    ethernet_payload, write_ethernet_header, MacAddr, ETHERTYPE_LLDP, ETH_HEADER_SIZE,
    LLDP_MULTICAST, MAX_ETH_PAYLOAD,
};
pub use traits::{CaptureTransmitter, PortTransmitter};

#[cfg(target_os = "linux")]
pub use packet::{InterfaceTransmitter, PacketSocket};
