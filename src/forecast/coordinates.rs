//! Coordinate Key Module
//!
//! Normalizes latitude/longitude pairs into a low-cardinality cache key.

use std::fmt;
use std::hash::{Hash, Hasher};

// == Coordinates ==
/// A geographic position rounded to two decimal places.
///
/// Nearby positions collapse onto the same value, so two requests a few
/// metres apart share one cache entry. Equality and hashing only ever see
/// the rounded values.
#[derive(Debug, Clone, Copy)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    // == Constructor ==
    /// Creates a key from raw coordinates, rounding each axis half-up.
    ///
    /// Out-of-range values are accepted as-is; range checks belong to the
    /// HTTP layer.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_two_decimals(latitude),
            longitude: round_two_decimals(longitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Bit patterns used for equality and hashing.
    ///
    /// Rounding never yields `-0.0` (the `+ 0.5` shift lands on `+0.0`), so
    /// bitwise comparison agrees with numeric comparison for finite input.
    fn key_bits(&self) -> (u64, u64) {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

impl PartialEq for Coordinates {
    fn eq(&self, other: &Self) -> bool {
        self.key_bits() == other.key_bits()
    }
}

impl Eq for Coordinates {}

impl Hash for Coordinates {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.latitude, self.longitude)
    }
}

// == Utility Functions ==
fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}
