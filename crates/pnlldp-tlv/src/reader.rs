use tracing::trace;

use crate::codec::{decode_tlv, Tlv};
use crate::error::Result;

/// Walks the TLV sequence of one LLDPDU.
///
/// Yields every TLV up to, but not including, the first End of LLDPDU.
/// Iteration also ends cleanly when the buffer is exhausted. After the first
/// decoding error the reader yields that error once and then stops.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    buf: &'a [u8],
    offset: usize,
    saw_end: bool,
    done: bool,
}

impl<'a> TlvReader<'a> {
    /// Read TLVs from the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self::at(buf, 0)
    }

    /// Read TLVs from `buf`, starting at byte `offset`.
    pub fn at(buf: &'a [u8], offset: usize) -> Self {
        Self {
            buf,
            offset,
            saw_end: false,
            done: offset >= buf.len(),
        }
    }

    /// Offset of the next TLV to decode.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// True once the End of LLDPDU TLV has been consumed.
    pub fn saw_end(&self) -> bool {
        self.saw_end
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<Tlv<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match decode_tlv(self.buf, self.offset) {
            Ok((tlv, next)) => {
                self.offset = next;
                if tlv.is_end() {
                    self.saw_end = true;
                    self.done = true;
                    return None;
                }
                if next >= self.buf.len() {
                    self.done = true;
                }
                trace!(tlv_type = tlv.tlv_type, len = tlv.value.len(), "decoded TLV");
                Some(Ok(tlv))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
