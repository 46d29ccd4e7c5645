use bytes::{BufMut, BytesMut};

use crate::error::{Result, TlvError};
use crate::types::{OrgTlv, TLV_END, TLV_ORG_SPECIFIC};

/// TLV header: type (7 bits) + length (9 bits) = 2 bytes.
pub const HEADER_SIZE: usize = 2;

/// Largest value the 9-bit length field can describe.
pub const MAX_VALUE_LEN: usize = 0x1FF;

/// Largest type the 7-bit type field can describe.
pub const MAX_TLV_TYPE: u8 = 0x7F;

/// A decoded TLV borrowing its value from the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    /// 7-bit TLV type.
    pub tlv_type: u8,
    /// Value bytes (length taken from the header).
    pub value: &'a [u8],
}

impl<'a> Tlv<'a> {
    /// Create a TLV view.
    pub fn new(tlv_type: u8, value: &'a [u8]) -> Self {
        Self { tlv_type, value }
    }

    /// True for the zero-length type-0 record closing an LLDPDU.
    pub fn is_end(&self) -> bool {
        self.tlv_type == TLV_END && self.value.is_empty()
    }

    /// The total wire size of this TLV (header + value).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.value.len()
    }

    /// Split an organizationally specific TLV into OUI, subtype and body.
    ///
    /// Returns `None` for other types or when the value is shorter than the
    /// 4-byte OUI + subtype prefix.
    pub fn org(&self) -> Option<OrgTlv<'a>> {
        if self.tlv_type != TLV_ORG_SPECIFIC || self.value.len() < 4 {
            return None;
        }
        Some(OrgTlv {
            oui: [self.value[0], self.value[1], self.value[2]],
            subtype: self.value[3],
            body: &self.value[4..],
        })
    }
}

/// Encode one TLV into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬────────────┬─────────────────┐
/// │ Type     │ Length     │ Value            │
/// │ (7 bits) │ (9 bits)   │ (Length bytes)   │
/// └──────────┴────────────┴─────────────────┘
///   first two bytes big-endian: (type << 9) | length
/// ```
pub fn encode_tlv(tlv_type: u8, value: &[u8], dst: &mut BytesMut) -> Result<()> {
    if tlv_type > MAX_TLV_TYPE {
        return Err(TlvError::InvalidType(tlv_type));
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(TlvError::ValueTooLong {
            len: value.len(),
            max: MAX_VALUE_LEN,
        });
    }
    dst.reserve(HEADER_SIZE + value.len());
    dst.put_u16((u16::from(tlv_type) << 9) | value.len() as u16);
    dst.put_slice(value);
    Ok(())
}

/// Type of the TLV whose header starts at `offset`, without checking that
/// its value fits in the buffer.
pub fn peek_type(buf: &[u8], offset: usize) -> Option<u8> {
    let end = offset.checked_add(HEADER_SIZE)?;
    let header = buf.get(offset..end)?;
    Some(header[0] >> 1)
}

/// Decode the TLV starting at `offset`.
///
/// Returns the TLV and the offset of the byte following it. The declared
/// length is checked against the buffer before any value byte is touched.
pub fn decode_tlv(buf: &[u8], offset: usize) -> Result<(Tlv<'_>, usize)> {
    let available = buf.len().saturating_sub(offset);
    if available < HEADER_SIZE {
        return Err(TlvError::Truncated {
            offset,
            needed: HEADER_SIZE,
            available,
        });
    }

    let header = u16::from_be_bytes([buf[offset], buf[offset + 1]]);
    let tlv_type = (header >> 9) as u8;
    let len = usize::from(header & 0x01FF);

    if HEADER_SIZE + len > available {
        return Err(TlvError::Truncated {
            offset,
            needed: HEADER_SIZE + len,
            available,
        });
    }
    if tlv_type == TLV_END && len != 0 {
        return Err(TlvError::BadEnd { offset, len });
    }

    let start = offset + HEADER_SIZE;
    let next = start + len;
    Ok((Tlv::new(tlv_type, &buf[start..next]), next))
}
