//! Floating point ranges, as declared by `@FloatRange`
//!
//! Unlike integer ranges, each end can be inclusive or exclusive
//! (`fromInclusive`/`toInclusive`). Infinite bounds mean "unbounded".

use super::int_range::IntRangeConstraint;
use super::range::format_double;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRangeConstraint {
    from: f64,
    to: f64,
    from_inclusive: bool,
    to_inclusive: bool,
    inferred: bool,
}

impl FloatRangeConstraint {
    pub fn range(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            from_inclusive: true,
            to_inclusive: true,
            inferred: false,
        }
    }

    pub fn at_least(from: f64) -> Self {
        Self::range(from, f64::INFINITY)
    }

    pub fn greater_than(from: f64) -> Self {
        Self::at_least(from).with_from_inclusive(false)
    }

    pub fn at_most(to: f64) -> Self {
        Self::range(f64::NEG_INFINITY, to)
    }

    pub fn less_than(to: f64) -> Self {
        Self::at_most(to).with_to_inclusive(false)
    }

    pub fn with_from_inclusive(mut self, inclusive: bool) -> Self {
        self.from_inclusive = inclusive;
        self
    }

    pub fn with_to_inclusive(mut self, inclusive: bool) -> Self {
        self.to_inclusive = inclusive;
        self
    }

    pub fn with_inferred(mut self, inferred: bool) -> Self {
        self.inferred = inferred;
        self
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn from_inclusive(&self) -> bool {
        self.from_inclusive
    }

    pub fn to_inclusive(&self) -> bool {
        self.to_inclusive
    }

    pub fn inferred(&self) -> bool {
        self.inferred
    }

    fn above_lower(&self, value: f64) -> bool {
        if self.from_inclusive {
            value >= self.from
        } else {
            value > self.from
        }
    }

    fn below_upper(&self, value: f64) -> bool {
        if self.to_inclusive {
            value <= self.to
        } else {
            value < self.to
        }
    }

    pub fn is_valid(&self, value: f64) -> bool {
        self.above_lower(value) && self.below_upper(value)
    }

    pub fn is_satisfiable(&self) -> bool {
        self.from < self.to || (self.from == self.to && self.from_inclusive && self.to_inclusive)
    }

    pub fn is_infinite(&self) -> bool {
        self.from.is_infinite() || self.to.is_infinite()
    }

    pub fn and(&self, other: &FloatRangeConstraint) -> FloatRangeConstraint {
        let (from, from_inclusive) = if self.from > other.from {
            (self.from, self.from_inclusive)
        } else if self.from < other.from {
            (other.from, other.from_inclusive)
        } else {
            (self.from, self.from_inclusive && other.from_inclusive)
        };
        let (to, to_inclusive) = if self.to < other.to {
            (self.to, self.to_inclusive)
        } else if self.to > other.to {
            (other.to, other.to_inclusive)
        } else {
            (self.to, self.to_inclusive && other.to_inclusive)
        };
        FloatRangeConstraint {
            from,
            to,
            from_inclusive,
            to_inclusive,
            inferred: self.inferred && other.inferred,
        }
    }

    pub fn contains(&self, other: &FloatRangeConstraint) -> bool {
        let lower = self.from < other.from
            || (self.from == other.from && (self.from_inclusive || !other.from_inclusive));
        let upper = self.to > other.to
            || (self.to == other.to && (self.to_inclusive || !other.to_inclusive));
        lower && upper
    }

    /// Narrows to the integers inside the range: an exclusive bound drops
    /// the boundary integer itself.
    pub fn to_int(&self) -> IntRangeConstraint {
        let from = if self.from == f64::NEG_INFINITY {
            i64::MIN
        } else if self.from_inclusive {
            self.from.ceil() as i64
        } else {
            (self.from.floor() as i64).saturating_add(1)
        };
        let to = if self.to == f64::INFINITY {
            i64::MAX
        } else if self.to_inclusive {
            self.to.floor() as i64
        } else {
            (self.to.ceil() as i64).saturating_sub(1)
        };
        IntRangeConstraint::range(from, to).with_inferred(self.inferred)
    }

    pub(crate) fn lower_text(&self) -> Option<String> {
        if self.from == f64::NEG_INFINITY {
            return None;
        }
        let op = if self.from_inclusive { "≥" } else { ">" };
        Some(format!("{} {}", op, format_double(self.from)))
    }

    pub(crate) fn upper_text(&self) -> Option<String> {
        if self.to == f64::INFINITY {
            return None;
        }
        let op = if self.to_inclusive { "≤" } else { "<" };
        Some(format!("{} {}", op, format_double(self.to)))
    }

    pub fn describe(&self, actual: Option<f64>) -> String {
        if let Some(message) = actual.and_then(|value| self.violation(value, &format_double(value))) {
            return message;
        }

        let mut message = if self.from == self.to && self.from_inclusive && self.to_inclusive {
            format!("Value must be {}", format_double(self.from))
        } else {
            match (self.lower_text(), self.upper_text()) {
                (Some(lower), Some(upper)) => format!("Value must be {} and {}", lower, upper),
                (Some(bound), None) | (None, Some(bound)) => format!("Value must be {}", bound),
                (None, None) => "Value can be any number".to_string(),
            }
        };
        if !self.is_satisfiable() {
            message.push_str(" (not possible)");
        }
        message
    }

    /// Like [`describe`](Self::describe) for an integer argument, which is
    /// shown as written (`was 5`, not `was 5.0`)
    pub fn describe_int(&self, actual: i64) -> String {
        self.violation(actual as f64, &actual.to_string())
            .unwrap_or_else(|| self.describe(None))
    }

    fn violation(&self, value: f64, shown: &str) -> Option<String> {
        let bound = if !self.above_lower(value) {
            self.lower_text()
        } else if !self.below_upper(value) {
            self.upper_text()
        } else {
            None
        }?;
        Some(format!("Value must be {} (was {})", bound, shown))
    }
}
