//! Size constraints, as declared by `@Size(value, min, max, multiple)`
//!
//! Applies to string lengths and array/collection sizes. An exact size is
//! stored as `min == max`.

use super::range::delta_message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeConstraint {
    min: i64,
    max: i64,
    multiple: i64,
    inferred: bool,
}

impl SizeConstraint {
    pub fn range(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            multiple: 1,
            inferred: false,
        }
    }

    pub fn exactly(size: i64) -> Self {
        Self::range(size, size)
    }

    pub fn at_least(min: i64) -> Self {
        Self::range(min, i64::MAX)
    }

    pub fn at_most(max: i64) -> Self {
        Self::range(i64::MIN, max)
    }

    pub fn with_multiple(mut self, multiple: i64) -> Self {
        assert!(multiple > 0, "size multiple must be positive, was {}", multiple);
        self.multiple = multiple;
        self
    }

    pub fn with_inferred(mut self, inferred: bool) -> Self {
        self.inferred = inferred;
        self
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn multiple(&self) -> i64 {
        self.multiple
    }

    pub fn inferred(&self) -> bool {
        self.inferred
    }

    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }

    pub fn is_valid(&self, actual: i64) -> bool {
        actual >= self.min && actual <= self.max && actual % self.multiple == 0
    }

    pub fn is_satisfiable(&self) -> bool {
        self.min <= self.max
    }

    pub fn is_infinite(&self) -> bool {
        self.min == i64::MIN || self.max == i64::MAX
    }

    pub fn and(&self, other: &SizeConstraint) -> SizeConstraint {
        SizeConstraint {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
            multiple: lcm(self.multiple, other.multiple),
            inferred: self.inferred && other.inferred,
        }
    }

    pub fn contains(&self, other: &SizeConstraint) -> bool {
        self.min <= other.min && other.max <= self.max && other.multiple % self.multiple == 0
    }

    /// `unit` is `"length"` for strings and `"size"` for everything else
    pub fn describe(&self, unit: &str, actual: Option<i64>) -> String {
        if let Some(actual) = actual {
            if self.is_exact() && actual != self.min {
                return format!("Expected {} {} (was {})", unit, self.min, actual);
            }
            if actual < self.min {
                return format!("Expected {} ≥ {} (was {})", unit, self.min, actual);
            }
            if actual > self.max {
                return format!("Expected {} ≤ {} (was {})", unit, self.max, actual);
            }
            if actual % self.multiple != 0 {
                let below = (actual / self.multiple) * self.multiple;
                return format!(
                    "Expected {} to be a multiple of {} (was {} and should be either {} or {})",
                    unit,
                    self.multiple,
                    actual,
                    below,
                    below + self.multiple
                );
            }
        }

        let mut parts = Vec::new();
        if self.is_exact() {
            parts.push(self.min.to_string());
        } else {
            if self.min != i64::MIN {
                parts.push(format!("≥ {}", self.min));
            }
            if self.max != i64::MAX {
                parts.push(format!("≤ {}", self.max));
            }
        }
        if self.multiple != 1 {
            parts.push(format!("a multiple of {}", self.multiple));
        }

        let mut message = if parts.is_empty() {
            format!("Expected any {}", unit)
        } else {
            format!("Expected {} {}", unit, parts.join(" and "))
        };
        if !self.is_satisfiable() {
            message.push_str(" (not possible)");
        }
        message
    }

    /// Explains how `actual` escapes this constraint. Callers must have
    /// established that `self` does not contain `actual`.
    pub fn describe_delta(&self, actual: &SizeConstraint, actual_label: &str, allowed_label: &str) -> String {
        if actual.min < self.min {
            delta_message(
                allowed_label,
                "Size",
                &format!("≥ {}", self.min),
                actual_label,
                actual.inferred,
                &format!("< {}", self.min),
            )
        } else if actual.max > self.max {
            delta_message(
                allowed_label,
                "Size",
                &format!("≤ {}", self.max),
                actual_label,
                actual.inferred,
                &format!("> {}", self.max),
            )
        } else if actual.multiple % self.multiple != 0 {
            delta_message(
                allowed_label,
                "Size",
                &format!("a multiple of {}", self.multiple),
                actual_label,
                actual.inferred,
                &format!("any multiple of {}", actual.multiple),
            )
        } else {
            panic!("{:?} contains {:?}; there is no delta to describe", self, actual);
        }
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: i64, b: i64) -> i64 {
    a / gcd(a, b) * b
}
