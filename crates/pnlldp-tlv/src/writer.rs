use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{HEADER_SIZE, MAX_TLV_TYPE, MAX_VALUE_LEN};
use crate::error::{Result, TlvError};
use crate::types::{TLV_END, TLV_ORG_SPECIFIC};

/// Default LLDPDU budget: one untagged Ethernet payload.
pub const DEFAULT_BUDGET: usize = 1500;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Builds one LLDPDU within a fixed byte budget.
///
/// Room for the closing End of LLDPDU TLV is always held back, so a writer
/// that accepted every TLV can always be finished. A TLV that does not fit
/// is rejected without touching the buffer.
#[derive(Debug)]
pub struct LldpduWriter {
    buf: BytesMut,
    start: usize,
    budget: usize,
}

impl LldpduWriter {
    /// Create a writer with the default budget.
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_BUDGET)
    }

    /// Create a writer with an explicit budget in bytes.
    pub fn with_budget(budget: usize) -> Self {
        Self::with_prefix(BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY), budget)
    }

    /// Continue writing after bytes already in `prefix` (e.g. an Ethernet header).
    ///
    /// The prefix does not count against `budget`.
    pub fn with_prefix(prefix: BytesMut, budget: usize) -> Self {
        Self {
            start: prefix.len(),
            buf: prefix,
            budget,
        }
    }

    /// Append a TLV.
    pub fn put_tlv(&mut self, tlv_type: u8, value: &[u8]) -> Result<()> {
        self.put_parts(tlv_type, &[value])
    }

    /// Append an organizationally specific TLV: OUI, subtype, body.
    pub fn put_org_tlv(&mut self, oui: [u8; 3], subtype: u8, body: &[u8]) -> Result<()> {
        self.put_parts(
            TLV_ORG_SPECIFIC,
            &[oui.as_slice(), std::slice::from_ref(&subtype), body],
        )
    }

    /// Append a TLV whose value is the concatenation of `parts`.
    pub fn put_parts(&mut self, tlv_type: u8, parts: &[&[u8]]) -> Result<()> {
        if tlv_type > MAX_TLV_TYPE {
            return Err(TlvError::InvalidType(tlv_type));
        }
        let len: usize = parts.iter().map(|part| part.len()).sum();
        if len > MAX_VALUE_LEN {
            return Err(TlvError::ValueTooLong {
                len,
                max: MAX_VALUE_LEN,
            });
        }
        let needed = HEADER_SIZE + len;
        let remaining = self.remaining();
        if needed > remaining {
            return Err(TlvError::BudgetExceeded { needed, remaining });
        }

        self.buf.reserve(needed);
        self.buf.put_u16((u16::from(tlv_type) << 9) | len as u16);
        for part in parts {
            self.buf.put_slice(part);
        }
        Ok(())
    }

    /// Bytes still available for TLVs, End of LLDPDU excluded.
    pub fn remaining(&self) -> usize {
        self.budget
            .saturating_sub(self.len())
            .saturating_sub(HEADER_SIZE)
    }

    /// LLDPDU bytes written so far (prefix excluded).
    pub fn len(&self) -> usize {
        self.buf.len() - self.start
    }

    /// True when no TLV has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close the LLDPDU with End of LLDPDU and return the whole buffer.
    pub fn finish(mut self) -> Bytes {
        self.buf.put_u16(u16::from(TLV_END) << 9);
        self.buf.freeze()
    }
}

impl Default for LldpduWriter {
    fn default() -> Self {
        Self::new()
    }
}
