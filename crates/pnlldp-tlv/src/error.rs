/// Errors that can occur during TLV encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TlvError {
    /// The value does not fit the 9-bit length field.
    #[error("TLV value too long ({len} bytes, max {max})")]
    ValueTooLong { len: usize, max: usize },

    /// The type does not fit the 7-bit type field.
    #[error("TLV type {0} out of range (max 127)")]
    InvalidType(u8),

    /// The header or the declared value runs past the end of the buffer.
    #[error("truncated TLV at offset {offset} (needs {needed} bytes, {available} available)")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A type-0 TLV carried a non-zero length.
    #[error("End of LLDPDU TLV at offset {offset} has length {len}")]
    BadEnd { offset: usize, len: usize },

    /// Appending the TLV would exceed the frame budget.
    #[error("LLDPDU budget exceeded (needs {needed} bytes, {remaining} remaining)")]
    BudgetExceeded { needed: usize, remaining: usize },
}

pub type Result<T> = std::result::Result<T, TlvError>;
