//! IEEE 802.1AB LLDP TLV encoding and decoding.
//!
//! Every LLDPDU is a sequence of Type-Length-Value records:
//! - A 7-bit type and a 9-bit length packed big-endian into 2 bytes
//! - Up to 511 value bytes
//! - A zero-length type-0 record (End of LLDPDU) closing the sequence
//!
//! Decoding never reads past the buffer it is given, whatever the header
//! claims. Encoding never emits a TLV that would overrun the frame budget.

pub mod codec;
pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use codec::{
    decode_tlv, encode_tlv, peek_type, Tlv, HEADER_SIZE, MAX_TLV_TYPE, MAX_VALUE_LEN,
};
pub use error::{Result, TlvError};
pub use reader::TlvReader;
pub use types::{
    org_tlv_name, tlv_type_name, OrgTlv, OUI_IEEE_802_3, OUI_PROFINET, TLV_CHASSIS_ID, TLV_END,
    TLV_MANAGEMENT_ADDRESS, TLV_ORG_SPECIFIC, TLV_PORT_DESCRIPTION, TLV_PORT_ID,
    TLV_SYSTEM_CAPABILITIES, TLV_SYSTEM_DESCRIPTION, TLV_SYSTEM_NAME, TLV_TTL,
};
pub use writer::{LldpduWriter, DEFAULT_BUDGET};
