use std::fmt;
use std::iter::FusedIterator;
use std::num::NonZeroU16;

/// A local port number, `1..=N`.
///
/// Zero is not a port; it only ever appears as the "done" sentinel of
/// [`PortIter::next_or_zero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortNumber(NonZeroU16);

impl PortNumber {
    pub const fn new(port: u16) -> Option<Self> {
        match NonZeroU16::new(port) {
            Some(port) => Some(Self(port)),
            None => None,
        }
    }

    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Zero-based index into per-port tables.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0.get() - 1)
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for PortNumber {
    type Error = crate::LldpError;

    fn try_from(port: u16) -> Result<Self, Self::Error> {
        Self::new(port).ok_or(crate::LldpError::InvalidPort(port))
    }
}

impl From<PortNumber> for u16 {
    fn from(port: PortNumber) -> Self {
        port.get()
    }
}

/// Walks the local ports `1..=N` in order.
///
/// Finite, and restartable with [`restart`](Self::restart).
#[derive(Debug, Clone)]
pub struct PortIter {
    next: u16,
    count: u16,
}

impl PortIter {
    pub fn new(count: u16) -> Self {
        Self { next: 1, count }
    }

    pub fn restart(&mut self) {
        self.next = 1;
    }

    /// Next port number, or 0 once every port has been visited.
    pub fn next_or_zero(&mut self) -> u16 {
        self.next().map_or(0, PortNumber::get)
    }
}

impl Iterator for PortIter {
    type Item = PortNumber;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == 0 || self.next > self.count {
            return None;
        }
        let port = PortNumber::new(self.next);
        // Wraps to 0 after u16::MAX, which also ends iteration.
        self.next = self.next.wrapping_add(1);
        port
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = if self.next == 0 {
            0
        } else {
            usize::from(self.count.saturating_sub(self.next - 1))
        };
        (left, Some(left))
    }
}

impl ExactSizeIterator for PortIter {}
impl FusedIterator for PortIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_port() {
        assert!(PortNumber::new(0).is_none());
        assert_eq!(PortNumber::new(3).map(PortNumber::get), Some(3));
        assert!(matches!(
            PortNumber::try_from(0),
            Err(crate::LldpError::InvalidPort(0))
        ));
    }

    #[test]
    fn iterates_all_ports_then_stops() {
        let ports: Vec<u16> = PortIter::new(4).map(PortNumber::get).collect();
        assert_eq!(ports, vec![1, 2, 3, 4]);
        assert_eq!(PortIter::new(0).count(), 0);
        assert_eq!(PortIter::new(4).len(), 4);
    }

    #[test]
    fn zero_sentinel_and_restart() {
        let mut iter = PortIter::new(2);
        assert_eq!(iter.next_or_zero(), 1);
        assert_eq!(iter.next_or_zero(), 2);
        assert_eq!(iter.next_or_zero(), 0);
        assert_eq!(iter.next_or_zero(), 0);

        iter.restart();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next_or_zero(), 1);
    }

    #[test]
    fn full_range_terminates() {
        assert_eq!(PortIter::new(u16::MAX).count(), usize::from(u16::MAX));
    }
}
