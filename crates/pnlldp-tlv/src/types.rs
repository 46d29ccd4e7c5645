//! TLV type codes, subtypes and organizationally unique identifiers.
//!
//! Types 0-8 and 127 are defined by IEEE 802.1AB.
//! Types 9-126 are reserved and skipped by receivers.

/// End of LLDPDU.
pub const TLV_END: u8 = 0;

/// Chassis ID (mandatory, first).
pub const TLV_CHASSIS_ID: u8 = 1;

/// Port ID (mandatory, second).
pub const TLV_PORT_ID: u8 = 2;

/// Time To Live (mandatory, third).
pub const TLV_TTL: u8 = 3;

/// Port Description.
pub const TLV_PORT_DESCRIPTION: u8 = 4;

/// System Name.
pub const TLV_SYSTEM_NAME: u8 = 5;

/// System Description.
pub const TLV_SYSTEM_DESCRIPTION: u8 = 6;

/// System Capabilities.
pub const TLV_SYSTEM_CAPABILITIES: u8 = 7;

/// Management Address.
pub const TLV_MANAGEMENT_ADDRESS: u8 = 8;

/// Organizationally Specific.
pub const TLV_ORG_SPECIFIC: u8 = 127;

/// Chassis ID subtype: MAC address.
pub const CHASSIS_SUBTYPE_MAC: u8 = 4;

/// Chassis ID subtype: locally assigned (PROFINET station name).
pub const CHASSIS_SUBTYPE_LOCAL: u8 = 7;

/// Port ID subtype: MAC address.
pub const PORT_SUBTYPE_MAC: u8 = 3;

/// Port ID subtype: locally assigned.
pub const PORT_SUBTYPE_LOCAL: u8 = 7;

/// Management address subtype (IANA address family): IPv4.
pub const ADDRESS_FAMILY_IPV4: u8 = 1;

/// Management address subtype (IANA address family): 802 MAC.
pub const ADDRESS_FAMILY_802: u8 = 6;

/// Management interface numbering subtype: ifIndex.
pub const INTERFACE_SUBTYPE_IFINDEX: u8 = 2;

/// PROFINET (PNO) OUI.
pub const OUI_PROFINET: [u8; 3] = [0x00, 0x0E, 0xCF];

/// IEEE 802.3 OUI.
pub const OUI_IEEE_802_3: [u8; 3] = [0x00, 0x12, 0x0F];

/// PROFINET subtype: LLDP_PNIO_DELAY.
pub const PROFINET_SUBTYPE_DELAY: u8 = 1;

/// PROFINET subtype: LLDP_PNIO_PORTSTATUS.
pub const PROFINET_SUBTYPE_PORT_STATUS: u8 = 2;

/// PROFINET subtype: LLDP_PNIO_CHASSIS_MAC.
pub const PROFINET_SUBTYPE_CHASSIS_MAC: u8 = 5;

/// IEEE 802.3 subtype: MAC/PHY Configuration/Status.
pub const IEEE_802_3_SUBTYPE_MAC_PHY: u8 = 1;

/// An organizationally specific TLV split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgTlv<'a> {
    pub oui: [u8; 3],
    pub subtype: u8,
    pub body: &'a [u8],
}

/// Returns a human-readable name for a TLV type.
pub fn tlv_type_name(tlv_type: u8) -> &'static str {
    match tlv_type {
        TLV_END => "END",
        TLV_CHASSIS_ID => "CHASSIS_ID",
        TLV_PORT_ID => "PORT_ID",
        TLV_TTL => "TTL",
        TLV_PORT_DESCRIPTION => "PORT_DESCRIPTION",
        TLV_SYSTEM_NAME => "SYSTEM_NAME",
        TLV_SYSTEM_DESCRIPTION => "SYSTEM_DESCRIPTION",
        TLV_SYSTEM_CAPABILITIES => "SYSTEM_CAPABILITIES",
        TLV_MANAGEMENT_ADDRESS => "MANAGEMENT_ADDRESS",
        TLV_ORG_SPECIFIC => "ORG_SPECIFIC",
        _ => "RESERVED",
    }
}

/// Returns a human-readable name for an organizationally specific TLV.
pub fn org_tlv_name(org: &OrgTlv<'_>) -> &'static str {
    match (org.oui, org.subtype) {
        (OUI_PROFINET, PROFINET_SUBTYPE_DELAY) => "PNIO_DELAY",
        (OUI_PROFINET, PROFINET_SUBTYPE_PORT_STATUS) => "PNIO_PORT_STATUS",
        (OUI_PROFINET, PROFINET_SUBTYPE_CHASSIS_MAC) => "PNIO_CHASSIS_MAC",
        (OUI_PROFINET, _) => "PNIO",
        (OUI_IEEE_802_3, IEEE_802_3_SUBTYPE_MAC_PHY) => "IEEE_802_3_MAC_PHY",
        (OUI_IEEE_802_3, _) => "IEEE_802_3",
        _ => "VENDOR",
    }
}
