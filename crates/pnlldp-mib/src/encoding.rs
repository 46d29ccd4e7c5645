use serde::Serialize;

use crate::error::{MibError, Result};

/// SNMPv2-TC TruthValue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum TruthValue {
    True = 1,
    False = 2,
}

impl From<bool> for TruthValue {
    fn from(value: bool) -> Self {
        if value {
            TruthValue::True
        } else {
            TruthValue::False
        }
    }
}

impl From<TruthValue> for i32 {
    fn from(value: TruthValue) -> Self {
        value as i32
    }
}

/// `true` is 1, `false` is 2.
pub fn truth_value(value: bool) -> i32 {
    TruthValue::from(value).into()
}

/// Encode a 16-bit capability mask as a two-octet BITS value.
///
/// Each octet is bit-reversed so that bit 0 of the mask lands in the most
/// significant bit of the first octet:
///
/// ```
/// use pnlldp_mib::bits_encode;
///
/// assert_eq!(bits_encode(0xF00F), [0xF0, 0x0F]);
/// assert_eq!(bits_encode(1 << 3 | 1 << 5 | 1 << 8 | 1 << 14), [0x14, 0x82]);
/// ```
pub fn bits_encode(mask: u16) -> [u8; 2] {
    let [high, low] = mask.to_be_bytes();
    [low.reverse_bits(), high.reverse_bits()]
}

/// Inverse of [`bits_encode`].
pub fn bits_decode(bits: [u8; 2]) -> u16 {
    u16::from_be_bytes([bits[1].reverse_bits(), bits[0].reverse_bits()])
}

/// Length-prefixed OCTET STRING: `[len, bytes...]`.
pub fn octet_string(bytes: &[u8], max: usize) -> Result<Vec<u8>> {
    let len = u8::try_from(bytes.len())
        .ok()
        .filter(|_| bytes.len() <= max)
        .ok_or(MibError::AddressTooLong {
            len: bytes.len(),
            max,
        })?;
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(out)
}
