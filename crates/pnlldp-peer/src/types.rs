//! Values carried in LLDP TLVs, as stored for both ends of a link.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Longest chassis/port identifier body (TLV length minus subtype byte).
pub const MAX_ID_LEN: usize = 255;

/// Longest management address body.
pub const MAX_MANAGEMENT_ADDRESS_LEN: usize = 31;

/// Autonegotiation capability bits as carried in the 802.3 MAC/PHY TLV.
pub mod autoneg {
    pub const OTHER: u16 = 1 << 15;
    pub const CAP_10BASE_T_HALF_DUPLEX: u16 = 1 << 14;
    pub const CAP_10BASE_T_FULL_DUPLEX: u16 = 1 << 13;
    pub const CAP_100BASE_T4: u16 = 1 << 12;
    pub const CAP_100BASE_TX_HALF_DUPLEX: u16 = 1 << 11;
    pub const CAP_100BASE_TX_FULL_DUPLEX: u16 = 1 << 10;
    pub const CAP_1000BASE_X_FULL_DUPLEX: u16 = 1 << 2;
    pub const CAP_1000BASE_T_HALF_DUPLEX: u16 = 1 << 1;
    pub const CAP_1000BASE_T_FULL_DUPLEX: u16 = 1;
}

/// Operational MAU types (RFC 4836 dot3MauType index).
pub mod mau {
    pub const UNKNOWN: u16 = 0x0000;
    pub const COPPER_10BASE_T: u16 = 0x0005;
    pub const COPPER_100BASE_TX_HALF_DUPLEX: u16 = 0x000F;
    pub const COPPER_100BASE_TX_FULL_DUPLEX: u16 = 0x0010;
    pub const COPPER_1000BASE_T_HALF_DUPLEX: u16 = 0x001D;
    pub const COPPER_1000BASE_T_FULL_DUPLEX: u16 = 0x001E;
}

/// Chassis identifier: subtype plus opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChassisId {
    pub subtype: u8,
    pub id: Vec<u8>,
}

impl ChassisId {
    pub fn new(subtype: u8, id: impl Into<Vec<u8>>) -> Self {
        Self {
            subtype,
            id: id.into(),
        }
    }

    /// The identifier as text, with invalid UTF-8 replaced.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.id)
    }
}

/// Port identifier: subtype plus opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PortId {
    pub subtype: u8,
    pub id: Vec<u8>,
}

impl PortId {
    pub fn new(subtype: u8, id: impl Into<Vec<u8>>) -> Self {
        Self {
            subtype,
            id: id.into(),
        }
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PortDescription(pub Vec<u8>);

impl PortDescription {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

/// Management address: IANA address family subtype plus address bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ManagementAddress {
    pub subtype: u8,
    pub address: Vec<u8>,
}

/// Interface numbering of the management address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ManagementPortIndex {
    pub subtype: u8,
    pub index: u32,
}

/// PROFINET port signal delays, in nanoseconds, in wire order.
///
/// Zero means "unknown" for every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalDelay {
    pub port_rx_delay_local: u32,
    pub port_rx_delay_remote: u32,
    pub port_tx_delay_local: u32,
    pub port_tx_delay_remote: u32,
    pub cable_delay_local: u32,
}

impl SignalDelay {
    pub(crate) const WIRE_SIZE: usize = 20;

    pub(crate) fn to_wire(self) -> [u8; Self::WIRE_SIZE] {
        let mut out = [0u8; Self::WIRE_SIZE];
        let fields = [
            self.port_rx_delay_local,
            self.port_rx_delay_remote,
            self.port_tx_delay_local,
            self.port_tx_delay_remote,
            self.cable_delay_local,
        ];
        for (chunk, value) in out.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&value.to_be_bytes());
        }
        out
    }

    pub(crate) fn from_wire(body: &[u8]) -> Option<Self> {
        if body.len() != Self::WIRE_SIZE {
            return None;
        }
        let field = |i: usize| {
            u32::from_be_bytes([body[i * 4], body[i * 4 + 1], body[i * 4 + 2], body[i * 4 + 3]])
        };
        Some(Self {
            port_rx_delay_local: field(0),
            port_rx_delay_remote: field(1),
            port_tx_delay_local: field(2),
            port_tx_delay_remote: field(3),
            cable_delay_local: field(4),
        })
    }
}

/// Ethernet link status as exchanged in the 802.3 MAC/PHY TLV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStatus {
    pub autoneg_supported: bool,
    pub autoneg_enabled: bool,
    /// Advertised capabilities, see [`autoneg`].
    pub advertised_capabilities: u16,
    /// Operational MAU type, see [`mau`].
    pub operational_mau_type: u16,
}

impl LinkStatus {
    pub(crate) const WIRE_SIZE: usize = 5;

    pub(crate) fn to_wire(self) -> [u8; Self::WIRE_SIZE] {
        let mut autoneg = 0u8;
        if self.autoneg_supported {
            autoneg |= 0x01;
        }
        if self.autoneg_enabled {
            autoneg |= 0x02;
        }
        let caps = self.advertised_capabilities.to_be_bytes();
        let mau = self.operational_mau_type.to_be_bytes();
        [autoneg, caps[0], caps[1], mau[0], mau[1]]
    }

    pub(crate) fn from_wire(body: &[u8]) -> Option<Self> {
        match *body {
            [autoneg, caps_hi, caps_lo, mau_hi, mau_lo] => Some(Self {
                autoneg_supported: autoneg & 0x01 != 0,
                autoneg_enabled: autoneg & 0x02 != 0,
                advertised_capabilities: u16::from_be_bytes([caps_hi, caps_lo]),
                operational_mau_type: u16::from_be_bytes([mau_hi, mau_lo]),
            }),
            _ => None,
        }
    }
}

/// The part of a local port the lower layers may change at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LocalPortState {
    pub link_status: LinkStatus,
    pub signal_delays: SignalDelay,
}

/// System capabilities TLV contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SystemCapabilities {
    pub supported: u16,
    pub enabled: u16,
}
