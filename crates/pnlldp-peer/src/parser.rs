//! Incoming LLDPDU validation and decoding into [`PeerInfo`].

use bytes::Bytes;
use pnlldp_tlv::types::{
    tlv_type_name, CHASSIS_SUBTYPE_LOCAL, CHASSIS_SUBTYPE_MAC, IEEE_802_3_SUBTYPE_MAC_PHY,
    PROFINET_SUBTYPE_CHASSIS_MAC, PROFINET_SUBTYPE_DELAY,
};
use pnlldp_tlv::{
    peek_type, Tlv, TlvError, TlvReader, OUI_IEEE_802_3, OUI_PROFINET, TLV_CHASSIS_ID,
    TLV_MANAGEMENT_ADDRESS, TLV_ORG_SPECIFIC, TLV_PORT_DESCRIPTION, TLV_PORT_ID,
    TLV_SYSTEM_CAPABILITIES, TLV_SYSTEM_DESCRIPTION, TLV_SYSTEM_NAME, TLV_TTL,
};
use pnlldp_transport::MacAddr;
use tracing::trace;

use crate::ports::PortNumber;
use crate::store::PeerInfo;
use crate::types::{
    ChassisId, LinkStatus, ManagementAddress, ManagementPortIndex, PortDescription, PortId,
    SignalDelay, SystemCapabilities, MAX_MANAGEMENT_ADDRESS_LEN,
};

const ID_LEN: std::ops::RangeInclusive<usize> = 2..=256;
const MAX_TEXT_LEN: usize = 255;
const MANAGEMENT_ADDRESS_LEN: std::ops::RangeInclusive<usize> = 9..=167;
const MAX_OID_LEN: usize = 128;
const ORG_HEADER_LEN: usize = 4;

/// Why an LLDPDU was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Tlv(#[from] TlvError),

    #[error("{name} TLV has invalid length {len}")]
    BadLength { name: &'static str, len: usize },

    #[error("expected {expected} TLV at position {position}, found {found}")]
    OutOfOrder {
        expected: &'static str,
        position: usize,
        found: &'static str,
    },

    #[error("{0} TLV appears more than once")]
    Duplicate(&'static str),

    #[error("LLDPDU ends before the {0} TLV")]
    Missing(&'static str),
}

/// Result of handing a received frame to the agent.
#[derive(Debug)]
pub enum RecvOutcome {
    /// Not an LLDPDU. The frame is returned untouched.
    NotLldp { frame: Bytes },
    /// An LLDPDU that broke a structural or length rule; nothing was stored.
    HandledMalformed { port: PortNumber, reason: ParseError },
    /// A well-formed LLDPDU; `changed` tells whether the peer record moved.
    HandledValid { port: PortNumber, changed: bool },
}

impl RecvOutcome {
    /// True unless the frame was handed back.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::NotLldp { .. })
    }
}

/// True when the bytes at `offset` start with a Chassis ID TLV header.
///
/// Only the 2-byte header is looked at. A first TLV whose value runs past
/// the buffer is still LLDP and is rejected later by [`parse_lldpdu`].
pub fn starts_with_lldp(buf: &[u8], offset: usize) -> bool {
    peek_type(buf, offset) == Some(TLV_CHASSIS_ID)
}

/// Decode the LLDPDU at `buf[offset..]`.
///
/// Chassis ID, Port ID and TTL must come first, in that order. Reserved TLV
/// types and organizationally specific TLVs this agent does not know are
/// skipped. Reading stops at End of LLDPDU or at the end of the buffer.
pub fn parse_lldpdu(buf: &[u8], offset: usize) -> Result<PeerInfo, ParseError> {
    const MANDATORY: [u8; 3] = [TLV_CHASSIS_ID, TLV_PORT_ID, TLV_TTL];

    let mut info = PeerInfo::default();
    let mut chassis_mac = None;
    let mut seen_management_address = false;
    let mut count = 0;

    for (position, tlv) in TlvReader::at(buf, offset).enumerate() {
        let tlv = tlv?;
        count = position + 1;

        if let Some(&expected) = MANDATORY.get(position) {
            if tlv.tlv_type != expected {
                return Err(ParseError::OutOfOrder {
                    expected: tlv_type_name(expected),
                    position,
                    found: tlv_type_name(tlv.tlv_type),
                });
            }
        }

        match tlv.tlv_type {
            TLV_CHASSIS_ID if position == 0 => {
                let (subtype, id) = parse_id(&tlv)?;
                info.chassis_id = ChassisId::new(subtype, id);
            }
            TLV_PORT_ID if position == 1 => {
                let (subtype, id) = parse_id(&tlv)?;
                info.port_id = PortId::new(subtype, id);
            }
            TLV_TTL if position == 2 => {
                let [hi, lo] = exact::<2>(&tlv)?;
                info.ttl_secs = u16::from_be_bytes([hi, lo]);
            }
            TLV_CHASSIS_ID | TLV_PORT_ID | TLV_TTL => {
                return Err(ParseError::Duplicate(tlv_type_name(tlv.tlv_type)));
            }
            TLV_PORT_DESCRIPTION => {
                info.port_description = PortDescription(text(&tlv)?.to_vec());
            }
            TLV_SYSTEM_NAME | TLV_SYSTEM_DESCRIPTION => {
                text(&tlv)?;
            }
            TLV_SYSTEM_CAPABILITIES => {
                let [a, b, c, d] = exact::<4>(&tlv)?;
                info.capabilities = SystemCapabilities {
                    supported: u16::from_be_bytes([a, b]),
                    enabled: u16::from_be_bytes([c, d]),
                };
            }
            TLV_MANAGEMENT_ADDRESS => {
                let (address, index) = parse_management_address(&tlv)?;
                // Only the first management address is kept.
                if !seen_management_address {
                    info.management_address = address;
                    info.management_port_index = index;
                    seen_management_address = true;
                }
            }
            TLV_ORG_SPECIFIC => parse_org(&tlv, &mut info, &mut chassis_mac)?,
            other => trace!(tlv_type = other, "skipping reserved TLV"),
        }
    }

    if let Some(&missing) = MANDATORY.get(count) {
        return Err(ParseError::Missing(tlv_type_name(missing)));
    }

    info.station_name = station_name(&info.chassis_id, chassis_mac);
    Ok(info)
}

fn bad_length(tlv: &Tlv<'_>) -> ParseError {
    ParseError::BadLength {
        name: tlv_type_name(tlv.tlv_type),
        len: tlv.value.len(),
    }
}

fn exact<const N: usize>(tlv: &Tlv<'_>) -> Result<[u8; N], ParseError> {
    <[u8; N]>::try_from(tlv.value).map_err(|_| bad_length(tlv))
}

fn text<'a>(tlv: &Tlv<'a>) -> Result<&'a [u8], ParseError> {
    if tlv.value.len() > MAX_TEXT_LEN {
        return Err(bad_length(tlv));
    }
    Ok(tlv.value)
}

fn parse_id<'a>(tlv: &Tlv<'a>) -> Result<(u8, &'a [u8]), ParseError> {
    if !ID_LEN.contains(&tlv.value.len()) {
        return Err(bad_length(tlv));
    }
    Ok((tlv.value[0], &tlv.value[1..]))
}

/// Management Address value layout:
///
/// ```text
/// addr_len(1) | subtype(1) | address(addr_len - 1)
///   | if_subtype(1) | if_number(4) | oid_len(1) | oid
/// ```
fn parse_management_address(
    tlv: &Tlv<'_>,
) -> Result<(ManagementAddress, ManagementPortIndex), ParseError> {
    let value = tlv.value;
    if !MANAGEMENT_ADDRESS_LEN.contains(&value.len()) {
        return Err(bad_length(tlv));
    }
    let address_len = usize::from(value[0]);
    if !(2..=MAX_MANAGEMENT_ADDRESS_LEN + 1).contains(&address_len) {
        return Err(bad_length(tlv));
    }
    let if_start = 1 + address_len;
    // if_subtype + if_number + oid_len
    if if_start + 6 > value.len() {
        return Err(bad_length(tlv));
    }
    let oid_len = usize::from(value[if_start + 5]);
    if oid_len > MAX_OID_LEN || if_start + 6 + oid_len != value.len() {
        return Err(bad_length(tlv));
    }

    let address = ManagementAddress {
        subtype: value[1],
        address: value[2..if_start].to_vec(),
    };
    let index = ManagementPortIndex {
        subtype: value[if_start],
        index: u32::from_be_bytes([
            value[if_start + 1],
            value[if_start + 2],
            value[if_start + 3],
            value[if_start + 4],
        ]),
    };
    Ok((address, index))
}

fn parse_org(
    tlv: &Tlv<'_>,
    info: &mut PeerInfo,
    chassis_mac: &mut Option<MacAddr>,
) -> Result<(), ParseError> {
    let Some(org) = tlv.org() else {
        return Err(ParseError::BadLength {
            name: tlv_type_name(tlv.tlv_type),
            len: tlv.value.len(),
        });
    };
    let org_length_error = |name: &'static str| ParseError::BadLength {
        name,
        len: ORG_HEADER_LEN + org.body.len(),
    };

    match (org.oui, org.subtype) {
        (OUI_PROFINET, PROFINET_SUBTYPE_DELAY) => {
            info.signal_delays =
                SignalDelay::from_wire(org.body).ok_or_else(|| org_length_error("PNIO_DELAY"))?;
        }
        (OUI_PROFINET, PROFINET_SUBTYPE_CHASSIS_MAC) => {
            *chassis_mac = Some(
                MacAddr::from_slice(org.body)
                    .ok_or_else(|| org_length_error("PNIO_CHASSIS_MAC"))?,
            );
        }
        (OUI_IEEE_802_3, IEEE_802_3_SUBTYPE_MAC_PHY) => {
            info.link_status = LinkStatus::from_wire(org.body)
                .ok_or_else(|| org_length_error("IEEE_802_3_MAC_PHY"))?;
        }
        (oui, subtype) => trace!(?oui, subtype, "skipping organizationally specific TLV"),
    }
    Ok(())
}

/// PROFINET station name of the neighbor.
///
/// A locally assigned chassis id is the station name. Otherwise the
/// neighbor is named by its chassis MAC, as `aa:bb:cc:dd:ee:ff`.
fn station_name(chassis_id: &ChassisId, chassis_mac: Option<MacAddr>) -> String {
    if chassis_id.subtype == CHASSIS_SUBTYPE_LOCAL {
        return chassis_id.to_string_lossy().into_owned();
    }
    let mac = chassis_mac.or_else(|| {
        (chassis_id.subtype == CHASSIS_SUBTYPE_MAC)
            .then(|| MacAddr::from_slice(&chassis_id.id))
            .flatten()
    });
    match mac {
        Some(mac) => mac.to_string(),
        None => chassis_id.to_string_lossy().into_owned(),
    }
}
