//! Closed integer ranges, as declared by `@IntRange(from, to)`

use super::float_range::FloatRangeConstraint;

/// `[from, to]` over `i64`; `i64::MIN`/`i64::MAX` stand for "unbounded"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntRangeConstraint {
    from: i64,
    to: i64,
    inferred: bool,
}

impl IntRangeConstraint {
    pub fn range(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            inferred: false,
        }
    }

    pub fn at_least(from: i64) -> Self {
        Self::range(from, i64::MAX)
    }

    pub fn at_most(to: i64) -> Self {
        Self::range(i64::MIN, to)
    }

    /// Mark the range as derived by flow analysis rather than declared
    pub fn with_inferred(mut self, inferred: bool) -> Self {
        self.inferred = inferred;
        self
    }

    pub fn from(&self) -> i64 {
        self.from
    }

    pub fn to(&self) -> i64 {
        self.to
    }

    pub fn inferred(&self) -> bool {
        self.inferred
    }

    pub fn is_valid(&self, value: i64) -> bool {
        value >= self.from && value <= self.to
    }

    /// False when no value can ever satisfy the range
    pub fn is_satisfiable(&self) -> bool {
        self.from <= self.to
    }

    /// True when at least one side is unbounded
    pub fn is_infinite(&self) -> bool {
        self.from == i64::MIN || self.to == i64::MAX
    }

    pub fn and(&self, other: &IntRangeConstraint) -> IntRangeConstraint {
        IntRangeConstraint {
            from: self.from.max(other.from),
            to: self.to.min(other.to),
            inferred: self.inferred && other.inferred,
        }
    }

    pub fn contains(&self, other: &IntRangeConstraint) -> bool {
        self.from <= other.from && other.to <= self.to
    }

    pub fn to_float(&self) -> FloatRangeConstraint {
        let from = if self.from == i64::MIN {
            f64::NEG_INFINITY
        } else {
            self.from as f64
        };
        let to = if self.to == i64::MAX {
            f64::INFINITY
        } else {
            self.to as f64
        };
        FloatRangeConstraint::range(from, to).with_inferred(self.inferred)
    }

    /// `≥ 5` style text for the lower bound, `None` when unbounded
    pub(crate) fn lower_text(&self) -> Option<String> {
        (self.from != i64::MIN).then(|| format!("≥ {}", self.from))
    }

    pub(crate) fn upper_text(&self) -> Option<String> {
        (self.to != i64::MAX).then(|| format!("≤ {}", self.to))
    }

    /// Describes the range, or only the violated side when `actual` is
    /// outside of it
    pub fn describe(&self, actual: Option<i64>) -> String {
        if let Some(value) = actual {
            if value < self.from {
                return format!("Value must be ≥ {} (was {})", self.from, value);
            }
            if value > self.to {
                return format!("Value must be ≤ {} (was {})", self.to, value);
            }
        }

        let mut message = if self.from == self.to {
            format!("Value must be {}", self.from)
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
}
