//! Distance value object

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo_math;

/// A non-negative distance in meters
///
/// Ordering is total so lists can be sorted on the numeric value rather than
/// on the formatted label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl Distance {
    /// Create a distance from meters; negative and NaN inputs clamp to zero
    #[must_use]
    pub fn from_meters(meters: f64) -> Self {
        if meters.is_nan() || meters < 0.0 {
            Self(0.0)
        } else {
            Self(meters)
        }
    }

    /// Raw value in meters
    #[must_use]
    pub const fn meters(&self) -> f64 {
        self.0
    }

    /// Label such as `"500 m"` or `"1.2 km"`
    #[must_use]
    pub fn label(&self) -> String {
        geo_math::format_distance(self.0)
    }
}

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
