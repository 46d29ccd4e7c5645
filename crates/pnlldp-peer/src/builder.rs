//! Outgoing LLDPDU assembly.
//!
//! TLVs are emitted in a fixed order:
//! 1. Chassis ID, Port ID, TTL (mandatory)
//! 2. Port Description, System Capabilities, Management Address
//! 3. PROFINET signal delays, PROFINET chassis MAC
//! 4. IEEE 802.3 MAC/PHY configuration/status
//! 5. End of LLDPDU
//!
//! A TLV that does not fit fails the whole build. Nothing partial is
//! ever returned.

use bytes::{Bytes, BytesMut};
use pnlldp_tlv::types::{
    IEEE_802_3_SUBTYPE_MAC_PHY, PROFINET_SUBTYPE_CHASSIS_MAC, PROFINET_SUBTYPE_DELAY,
};
use pnlldp_tlv::{
    LldpduWriter, TlvError, DEFAULT_BUDGET, OUI_IEEE_802_3, OUI_PROFINET, TLV_CHASSIS_ID,
    TLV_MANAGEMENT_ADDRESS, TLV_PORT_DESCRIPTION, TLV_PORT_ID, TLV_SYSTEM_CAPABILITIES, TLV_TTL,
};
use pnlldp_transport::{write_ethernet_header, ETH_HEADER_SIZE, MAX_ETH_PAYLOAD};

use crate::config::LldpConfig;
use crate::error::{LldpError, Result};
use crate::ports::PortNumber;
use crate::types::LocalPortState;

/// Build the LLDPDU for `port` (no Ethernet header).
pub fn build_lldpdu(
    config: &LldpConfig,
    port: PortNumber,
    state: &LocalPortState,
) -> Result<Bytes> {
    build_lldpdu_with_budget(config, port, state, DEFAULT_BUDGET)
}

/// Build the LLDPDU for `port` within `budget` bytes.
pub fn build_lldpdu_with_budget(
    config: &LldpConfig,
    port: PortNumber,
    state: &LocalPortState,
    budget: usize,
) -> Result<Bytes> {
    let mut writer = LldpduWriter::with_budget(budget);
    write_tlvs(&mut writer, config, port, state)?;
    Ok(writer.finish())
}

/// Build a complete Ethernet frame for `port`: header, LLDPDU, End.
pub fn build_frame(config: &LldpConfig, port: PortNumber, state: &LocalPortState) -> Result<Bytes> {
    let mut prefix = BytesMut::with_capacity(ETH_HEADER_SIZE + 256);
    write_ethernet_header(&mut prefix, config.source_mac(port)?);
    let mut writer = LldpduWriter::with_prefix(prefix, MAX_ETH_PAYLOAD);
    write_tlvs(&mut writer, config, port, state)?;
    Ok(writer.finish())
}

fn write_tlvs(
    writer: &mut LldpduWriter,
    config: &LldpConfig,
    port: PortNumber,
    state: &LocalPortState,
) -> Result<()> {
    let chassis_id = config.chassis_id();
    let port_id = config.port_id(port)?;
    let description = config.port_description(port)?;
    let address = config.management_address();
    let if_index = config.management_port_index();

    let overflow = |source: TlvError| match source {
        TlvError::BudgetExceeded { .. } => LldpError::BuildOverflow {
            port: port.get(),
            source,
        },
        other => LldpError::Tlv(other),
    };

    writer
        .put_parts(TLV_CHASSIS_ID, &[&[chassis_id.subtype], &chassis_id.id])
        .map_err(overflow)?;
    writer
        .put_parts(TLV_PORT_ID, &[&[port_id.subtype], &port_id.id])
        .map_err(overflow)?;
    writer
        .put_tlv(TLV_TTL, &config.ttl_secs.to_be_bytes())
        .map_err(overflow)?;
    writer
        .put_tlv(TLV_PORT_DESCRIPTION, description.as_bytes())
        .map_err(overflow)?;
    writer
        .put_parts(
            TLV_SYSTEM_CAPABILITIES,
            &[
                &config.system_capabilities.to_be_bytes(),
                &config.enabled_capabilities.to_be_bytes(),
            ],
        )
        .map_err(overflow)?;

    // Address string length counts the subtype byte; no OID is sent.
    let address_len = (address.address.len() + 1) as u8;
    writer
        .put_parts(
            TLV_MANAGEMENT_ADDRESS,
            &[
                &[address_len, address.subtype],
                &address.address,
                &[if_index.subtype],
                &if_index.index.to_be_bytes(),
                &[0],
            ],
        )
        .map_err(overflow)?;

    writer
        .put_org_tlv(
            OUI_PROFINET,
            PROFINET_SUBTYPE_DELAY,
            &state.signal_delays.to_wire(),
        )
        .map_err(overflow)?;
    writer
        .put_org_tlv(
            OUI_PROFINET,
            PROFINET_SUBTYPE_CHASSIS_MAC,
            &config.mac_address.octets(),
        )
        .map_err(overflow)?;
    writer
        .put_org_tlv(
            OUI_IEEE_802_3,
            IEEE_802_3_SUBTYPE_MAC_PHY,
            &state.link_status.to_wire(),
        )
        .map_err(overflow)?;
    Ok(())
}
