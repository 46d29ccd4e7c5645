//! LLDP-MIB value formatting.
//!
//! An SNMP agent serving the LLDP-MIB and LLDP-EXT-PNO-MIB needs the
//! agent's data in SNMP encodings: TruthValue integers, BITS octet pairs,
//! length-prefixed OCTET STRINGs. [`MibView`] wraps any [`LldpQuery`]
//! and hands out values already in those shapes.
//!
//! [`LldpQuery`]: pnlldp_peer::LldpQuery

pub mod encoding;
pub mod error;
pub mod view;

pub use encoding::{bits_decode, bits_encode, octet_string, truth_value, TruthValue};
pub use error::{MibError, Result};
pub use view::{LocalPortEntry, MibLinkStatus, MibManagementAddress, MibView, RemoteEntry};
