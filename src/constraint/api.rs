//! API level constraints
//!
//! An [`ApiConstraint`] is the half-open set of API levels `[from, to)`
//! guaranteed by a surrounding `SDK_INT` check, packed into a single `u32`
//! so it can be compared, hashed and serialized cheaply.
//!
//! ## Encoding
//!
//! ```text
//!  31            16 15             0
//! +----------------+----------------+
//! |       to       |      from      |
//! +----------------+----------------+
//! ```
//!
//! `to == INFINITY` means the range is open ended, `from == to` means no
//! API level satisfies it ("Nothing").

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitAnd, Not};

/// Sentinel upper bound, larger than any real API level
pub const INFINITY: u32 = 0x7FFF;

const SHIFT: u32 = 16;
const MASK: u32 = (1 << SHIFT) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiConstraint {
    bits: u32,
}

impl ApiConstraint {
    /// Every API level
    pub const ALL: ApiConstraint = ApiConstraint::pack(1, INFINITY);

    /// No API level at all
    pub const NOTHING: ApiConstraint = ApiConstraint::pack(1, 1);

    const fn pack(from: u32, to: u32) -> Self {
        Self {
            bits: (from & MASK) | ((to & MASK) << SHIFT),
        }
    }

    fn checked_level(api_level: u32) -> u32 {
        assert!(
            api_level < INFINITY,
            "API level {} must be below {}",
            api_level,
            INFINITY
        );
        api_level
    }

    /// `SDK_INT >= api_level`
    pub fn at_least(api_level: u32) -> Self {
        let level = Self::checked_level(api_level).max(1);
        Self::pack(level, INFINITY)
    }

    /// `SDK_INT > api_level`
    pub fn above(api_level: u32) -> Self {
        let level = Self::checked_level(api_level);
        Self::pack(level + 1, INFINITY)
    }

    /// `SDK_INT < api_level`
    pub fn below(api_level: u32) -> Self {
        let level = Self::checked_level(api_level);
        if level <= 1 {
            return Self::NOTHING;
        }
        Self::pack(1, level)
    }

    /// `SDK_INT <= api_level`
    pub fn at_most(api_level: u32) -> Self {
        let level = Self::checked_level(api_level);
        if level == 0 {
            return Self::NOTHING;
        }
        Self::pack(1, level + 1)
    }

    /// `SDK_INT == api_level`
    pub fn same(api_level: u32) -> Self {
        let level = Self::checked_level(api_level);
        if level == 0 {
            return Self::NOTHING;
        }
        Self::pack(level, level + 1)
    }

    /// `from <= SDK_INT < to`; `to` may be [`INFINITY`]
    pub fn range(from: u32, to: u32) -> Self {
        let from = Self::checked_level(from).max(1);
        assert!(to <= INFINITY, "upper bound {} exceeds {}", to, INFINITY);
        assert!(from <= to, "empty range [{}, {}) is inverted", from, to);
        Self::pack(from, to)
    }

    /// Inclusive lower bound
    pub fn from(&self) -> u32 {
        self.bits & MASK
    }

    /// Exclusive upper bound, [`INFINITY`] when open ended
    pub fn to(&self) -> u32 {
        (self.bits >> SHIFT) & MASK
    }

    pub fn is_empty(&self) -> bool {
        self.from() == self.to()
    }

    pub fn is_unbounded(&self) -> bool {
        self.to() == INFINITY
    }

    pub fn matches(&self, api_level: u32) -> bool {
        api_level >= self.from() && api_level < self.to()
    }

    /// True when the range starts at or below `api_level` and never ends
    pub fn always_at_least(&self, api_level: u32) -> bool {
        api_level >= self.from() && self.to() == INFINITY
    }

    /// True when `api_level` lies past the upper bound
    pub fn never_at_most(&self, api_level: u32) -> bool {
        api_level >= self.to()
    }

    pub fn intersect(&self, other: &ApiConstraint) -> ApiConstraint {
        let from = self.from().max(other.from());
        let to = self.to().min(other.to());
        if from >= to {
            Self::pack(from, from)
        } else {
            Self::pack(from, to)
        }
    }

    /// Hull of two ranges when they overlap or touch, `None` otherwise
    pub fn union(&self, other: &ApiConstraint) -> Option<ApiConstraint> {
        if self.is_empty() {
            return Some(*other);
        }
        if other.is_empty() {
            return Some(*self);
        }
        if self.from() > other.to() || other.from() > self.to() {
            return None;
        }
        Some(Self::pack(
            self.from().min(other.from()),
            self.to().max(other.to()),
        ))
    }

    /// Single-interval complement. An interior range such as `[5, 10)`
    /// comes back as `[10, 5)`; callers only invert one-sided ranges.
    pub fn invert(&self) -> ApiConstraint {
        let from = if self.to() == INFINITY { 1 } else { self.to() };
        let to = if self.from() == 1 { INFINITY } else { self.from() };
        Self::pack(from, to)
    }

    pub fn describe(&self) -> String {
        let from = self.from();
        let to = self.to();
        if from == to {
            "Nothing".to_string()
        } else if to == INFINITY {
            format!("API level ≥ {}", from)
        } else if from == 1 {
            format!("API level < {}", to)
        } else {
            format!("API level ≥ {} and API level < {}", from, to)
        }
    }

    pub fn serialize(&self) -> String {
        format!("{:x}", self.bits)
    }

    /// Accepts every value [`serialize`](Self::serialize) can produce,
    /// including the `from > to` form [`invert`](Self::invert) returns for
    /// interior ranges
    pub fn deserialize(text: &str) -> Result<ApiConstraint> {
        let bits = u32::from_str_radix(text.trim(), 16)
            .map_err(|_| Error::InvalidConstraint(text.to_string()))?;
        let constraint = ApiConstraint { bits };
        let (from, to) = (constraint.from(), constraint.to());
        if from < 1 || to < 1 || from > INFINITY || to > INFINITY {
            return Err(Error::InvalidConstraint(text.to_string()));
        }
        Ok(constraint)
    }
}

impl Default for ApiConstraint {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for ApiConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl BitAnd for ApiConstraint {
    type Output = ApiConstraint;

    fn bitand(self, rhs: ApiConstraint) -> ApiConstraint {
        self.intersect(&rhs)
    }
}

impl Not for ApiConstraint {
    type Output = ApiConstraint;

    fn not(self) -> ApiConstraint {
        self.invert()
    }
}

impl Serialize for ApiConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&ApiConstraint::serialize(self))
    }
}

impl<'de> Deserialize<'de> for ApiConstraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        ApiConstraint::deserialize(&text).map_err(serde::de::Error::custom)
    }
}
