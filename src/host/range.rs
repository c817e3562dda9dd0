//! IPv4 address ranges.

use std::fmt;
use std::net::Ipv4Addr;

/// Parses a dotted-quad IPv4 address.
///
/// Accepts exactly four dot-separated decimal octets in `0..=255`. Anything
/// else (hex, fewer parts, trailing dot, signs, whitespace) is rejected.
#[must_use]
pub fn parse_ipv4(value: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = value.split('.');

    for octet in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(Ipv4Addr::from(octets))
}

/// Inclusive, numerically ordered IPv4 range.
///
/// Construction guarantees `start <= end`, so a range always holds at least
/// one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    start: Ipv4Addr,
    end: Ipv4Addr,
}

impl AddressRange {
    /// Creates a range, or `None` when `start > end`.
    #[must_use]
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a range holding a single address.
    #[must_use]
    pub const fn single(address: Ipv4Addr) -> Self {
        Self {
            start: address,
            end: address,
        }
    }

    /// Parses both bounds, or `None` if either is malformed or they are out of order.
    #[must_use]
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Self::new(parse_ipv4(start)?, parse_ipv4(end)?)
    }

    #[must_use]
    pub const fn start(&self) -> Ipv4Addr {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Ipv4Addr {
        self.end
    }

    /// Number of addresses in the range, at least one.
    #[must_use]
    pub fn host_count(&self) -> u64 {
        u64::from(self.end.to_bits()) - u64::from(self.start.to_bits()) + 1
    }

    #[must_use]
    pub fn contains(&self, address: Ipv4Addr) -> bool {
        self.start <= address && address <= self.end
    }

    /// Returns `true` if `other` lies entirely inside this range.
    #[must_use]
    pub fn contains_range(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns `true` if the two ranges share at least one address.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Iterates the range in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        (self.start.to_bits()..=self.end.to_bits()).map(Ipv4Addr::from_bits)
    }

    /// Collects every address of the range in ascending order.
    #[must_use]
    pub fn expand(&self) -> Vec<Ipv4Addr> {
        self.iter().collect()
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Expands textual bounds into the ascending list of addresses they span.
///
/// Returns an empty list when either bound is malformed or `start > end`.
#[must_use]
pub fn expand_range(start: &str, end: &str) -> Vec<Ipv4Addr> {
    AddressRange::parse(start, end).map_or_else(Vec::new, |range| range.expand())
}
