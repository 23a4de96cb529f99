//! Range Detector
//!
//! Flags constants and value ranges that fall outside the range a
//! parameter allows, as declared by `@IntRange`, `@FloatRange` or `@Size`.
//!
//! ```kotlin
//! fun setAlpha(@IntRange(from = 0, to = 255) alpha: Int)
//!
//! setAlpha(300)            // Value must be ≤ 255 (was 300)
//! if (x > 10) setAlpha(x)  // Value must be ≤ 255 but `x` may be > 255
//! ```

use crate::analysis::{Finding, Issue};
use crate::constraint::{RangeConstraint, SizeConstraint};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A constant argument value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl FromStr for Number {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if let Ok(value) = text.parse::<i64>() {
            return Ok(Number::Int(value));
        }
        match text.parse::<f64>() {
            Ok(value) if !value.is_nan() => Ok(Number::Float(value)),
            _ => Err(Error::expression(s, "not a number")),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(value) => write!(f, "{}", value),
            Number::Float(value) => write!(f, "{}", value),
        }
    }
}

/// Detector for values outside of their allowed range
#[derive(Debug, Clone, Default)]
pub struct RangeDetector;

impl RangeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Checks a constant passed where `allowed` applies
    pub fn check_value(&self, subject: &str, allowed: &RangeConstraint, value: Number) -> Option<Finding> {
        let message = match (allowed, value) {
            (RangeConstraint::Int(c), Number::Int(v)) => (!c.is_valid(v)).then(|| c.describe(Some(v))),
            (RangeConstraint::Float(c), Number::Float(v)) => (!c.is_valid(v)).then(|| c.describe(Some(v))),
            (RangeConstraint::Float(c), Number::Int(v)) => (!c.is_valid(v as f64)).then(|| c.describe_int(v)),
            (RangeConstraint::Int(c), Number::Float(v)) => {
                // A fractional value for an integer parameter does not compile
                if v.fract() != 0.0 || v < i64::MIN as f64 || v > i64::MAX as f64 {
                    debug!("Skipping non-integral value {} for {}", v, subject);
                    return None;
                }
                let v = v as i64;
                (!c.is_valid(v)).then(|| c.describe(Some(v)))
            }
            (RangeConstraint::Size(c), Number::Int(v)) => return self.check_size(subject, c, "size", v),
            (RangeConstraint::Size(_), Number::Float(_)) => None,
        }?;
        Some(Finding::new(Issue::Range, subject).with_message(message))
    }

    /// Checks the length or size of a constant array, string or collection.
    /// `unit` is `"length"` for strings and arrays.
    pub fn check_size(&self, subject: &str, allowed: &SizeConstraint, unit: &str, actual: i64) -> Option<Finding> {
        if allowed.is_valid(actual) {
            return None;
        }
        Some(Finding::new(Issue::Range, subject).with_message(allowed.describe(unit, Some(actual))))
    }

    /// Checks that every value `actual` may take is allowed.
    ///
    /// Nothing is reported when containment cannot be decided, or when the
    /// actual range was inferred and is unbounded on one side: a bare
    /// `if (x > 10)` says nothing about the upper end.
    pub fn check_overlap(
        &self,
        subject: &str,
        allowed: &RangeConstraint,
        actual: &RangeConstraint,
        actual_label: &str,
        allowed_label: &str,
    ) -> Option<Finding> {
        if actual.is_inferred() && actual.is_infinite() {
            debug!("Skipping unbounded inferred range for {}", subject);
            return None;
        }
        if !actual.is_satisfiable() {
            return None;
        }
        match allowed.contains(actual) {
            Some(false) => {
                let message = allowed.describe_delta(actual, actual_label, allowed_label);
                Some(Finding::new(Issue::Range, subject).with_message(message))
            }
            Some(true) => None,
            None => {
                debug!("Cannot compare {:?} with {:?} for {}", actual, allowed, subject);
                None
            }
        }
    }
}
