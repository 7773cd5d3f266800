use std::fmt;

use serde::Serialize;

/// Strip every leading `'0'` from a raw circuit identifier.
///
/// The results CSV pads identifiers (`"00012A"`) while the boundary layer
/// does not always, so both sides go through this before any comparison.
/// An all-zero identifier collapses to the empty string.
#[inline]
pub fn normalize_circuit_id(raw: &str) -> &str {
    raw.trim_start_matches('0')
}

/// Normalized circuit identifier, the join key between votes and geometries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CircuitKey(String);

impl CircuitKey {
    /// Build a key from a raw identifier, normalizing it.
    pub fn new(raw: &str) -> Self {
        Self(normalize_circuit_id(raw).to_string())
    }

    /// The normalized identifier (possibly empty).
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }

    /// True for identifiers that were all zeros.
    #[inline]
    pub fn is_zero(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for CircuitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() { f.write_str("0") } else { f.write_str(&self.0) }
    }
}

impl From<&str> for CircuitKey {
    fn from(raw: &str) -> Self { Self::new(raw) }
}
