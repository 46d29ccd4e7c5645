//! Ethernet framing shared by every LLDP frame.

use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// EtherType carried by LLDP frames.
pub const ETHERTYPE_LLDP: u16 = 0x88CC;

/// EtherType of an IEEE 802.1Q VLAN tag.
const ETHERTYPE_VLAN: u16 = 0x8100;

/// Nearest-bridge LLDP multicast destination (IEEE 802.1AB).
pub const LLDP_MULTICAST: MacAddr = MacAddr([0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E]);

/// Destination (6) + source (6) + EtherType (2).
pub const ETH_HEADER_SIZE: usize = 14;

/// Largest payload carried by one untagged Ethernet frame.
pub const MAX_ETH_PAYLOAD: usize = 1500;

/// A six-octet IEEE 802 MAC address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Build an address from a slice, if it is exactly six bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.try_into().ok()?;
        Some(Self(octets))
    }

    /// Octets in transmission order.
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// True when the group bit of the first octet is set.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddr {
    type Err = TransportError;

    /// Accepts `aa:bb:cc:dd:ee:ff` and `aa-bb-cc-dd-ee-ff`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransportError::InvalidMac(s.to_string());
        let mut octets = [0u8; 6];
        let mut parts = s.trim().split([':', '-']);
        for octet in &mut octets {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddr {
    type Error = TransportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddr> for String {
    fn from(mac: MacAddr) -> Self {
        mac.to_string()
    }
}

/// Write the Ethernet header of an outgoing LLDP frame.
pub fn write_ethernet_header(dst: &mut BytesMut, source: MacAddr) {
    dst.reserve(ETH_HEADER_SIZE);
    dst.put_slice(&LLDP_MULTICAST.0);
    dst.put_slice(&source.0);
    dst.put_u16(ETHERTYPE_LLDP);
}

/// Offset of the LLDPDU inside a received Ethernet frame.
///
/// Returns `None` when the frame is not an LLDP frame. A single 802.1Q tag
/// in front of the EtherType is skipped.
pub fn ethernet_payload(frame: &[u8]) -> Option<usize> {
    let ethertype_at = |offset: usize| -> Option<u16> {
        let bytes = frame.get(offset..offset + 2)?;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    };

    match ethertype_at(12)? {
        ETHERTYPE_LLDP => Some(ETH_HEADER_SIZE),
        ETHERTYPE_VLAN if ethertype_at(16)? == ETHERTYPE_LLDP => Some(ETH_HEADER_SIZE + 4),
        _ => None,
    }
}
