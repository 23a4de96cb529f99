//! Range constraints of any kind
//!
//! [`RangeConstraint`] lets annotation-declared ranges and ranges inferred
//! from surrounding comparisons be combined and compared regardless of
//! whether they were declared as integers, floats or sizes.

use super::float_range::FloatRangeConstraint;
use super::int_range::IntRangeConstraint;
use super::size::SizeConstraint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeConstraint {
    Int(IntRangeConstraint),
    Float(FloatRangeConstraint),
    Size(SizeConstraint),
}

impl From<IntRangeConstraint> for RangeConstraint {
    fn from(constraint: IntRangeConstraint) -> Self {
        RangeConstraint::Int(constraint)
    }
}

impl From<FloatRangeConstraint> for RangeConstraint {
    fn from(constraint: FloatRangeConstraint) -> Self {
        RangeConstraint::Float(constraint)
    }
}

impl From<SizeConstraint> for RangeConstraint {
    fn from(constraint: SizeConstraint) -> Self {
        RangeConstraint::Size(constraint)
    }
}

impl RangeConstraint {
    pub fn is_inferred(&self) -> bool {
        match self {
            RangeConstraint::Int(c) => c.inferred(),
            RangeConstraint::Float(c) => c.inferred(),
            RangeConstraint::Size(c) => c.inferred(),
        }
    }

    pub fn is_infinite(&self) -> bool {
        match self {
            RangeConstraint::Int(c) => c.is_infinite(),
            RangeConstraint::Float(c) => c.is_infinite(),
            RangeConstraint::Size(c) => c.is_infinite(),
        }
    }

    pub fn is_satisfiable(&self) -> bool {
        match self {
            RangeConstraint::Int(c) => c.is_satisfiable(),
            RangeConstraint::Float(c) => c.is_satisfiable(),
            RangeConstraint::Size(c) => c.is_satisfiable(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RangeConstraint::Int(c) => c.describe(None),
            RangeConstraint::Float(c) => c.describe(None),
            RangeConstraint::Size(c) => c.describe("size", None),
        }
    }

    /// Intersection. Mixing integers and floats narrows the float side to
    /// integers first; sizes only combine with sizes, anything else leaves
    /// `self` unchanged.
    pub fn and(&self, other: &RangeConstraint) -> RangeConstraint {
        match (self, other) {
            (RangeConstraint::Int(a), RangeConstraint::Int(b)) => a.and(b).into(),
            (RangeConstraint::Float(a), RangeConstraint::Float(b)) => a.and(b).into(),
            (RangeConstraint::Int(a), RangeConstraint::Float(b)) => a.and(&b.to_int()).into(),
            (RangeConstraint::Float(a), RangeConstraint::Int(b)) => a.to_int().and(b).into(),
            (RangeConstraint::Size(a), RangeConstraint::Size(b)) => a.and(b).into(),
            _ => *self,
        }
    }

    /// Whether every value allowed by `other` is allowed by `self`.
    ///
    /// `None` when that cannot be decided: sizes compared with numbers, or
    /// an exclusive float bound sitting exactly on an integer bound.
    pub fn contains(&self, other: &RangeConstraint) -> Option<bool> {
        match (self, other) {
            (RangeConstraint::Int(a), RangeConstraint::Int(b)) => Some(a.contains(b)),
            (RangeConstraint::Float(a), RangeConstraint::Float(b)) => Some(a.contains(b)),
            (RangeConstraint::Size(a), RangeConstraint::Size(b)) => Some(a.contains(b)),
            (RangeConstraint::Int(a), RangeConstraint::Float(b)) => {
                if ambiguous_boundary(a, b) {
                    None
                } else {
                    Some(a.to_float().contains(b))
                }
            }
            (RangeConstraint::Float(a), RangeConstraint::Int(b)) => {
                if ambiguous_boundary(b, a) {
                    None
                } else {
                    Some(a.contains(&b.to_float()))
                }
            }
            _ => None,
        }
    }

    /// Describes how `actual` escapes the range allowed by `self`.
    ///
    /// Only meaningful when [`RangeConstraint::contains`] returned
    /// `Some(false)`; panics otherwise.
    pub fn describe_delta(&self, actual: &RangeConstraint, actual_label: &str, allowed_label: &str) -> String {
        let (allowed_lower, allowed_upper, allowed_span) = match self {
            RangeConstraint::Int(c) => (c.lower_text(), c.upper_text(), c.to_float()),
            RangeConstraint::Float(c) => (c.lower_text(), c.upper_text(), *c),
            RangeConstraint::Size(allowed) => match actual {
                RangeConstraint::Size(actual) => {
                    return allowed.describe_delta(actual, actual_label, allowed_label)
                }
                _ => panic!("cannot describe a size delta for {:?}", actual),
            },
        };
        let actual_span = match actual {
            RangeConstraint::Int(c) => c.to_float(),
            RangeConstraint::Float(c) => *c,
            RangeConstraint::Size(_) => panic!("cannot describe a numeric delta for {:?}", actual),
        };

        if escapes_below(&allowed_span, &actual_span) {
            if let Some(lower) = allowed_lower {
                return delta_message(
                    allowed_label,
                    "Value",
                    &lower,
                    actual_label,
                    actual.is_inferred(),
                    &complement(&lower),
                );
            }
        }
        if escapes_above(&allowed_span, &actual_span) {
            if let Some(upper) = allowed_upper {
                return delta_message(
                    allowed_label,
                    "Value",
                    &upper,
                    actual_label,
                    actual.is_inferred(),
                    &complement(&upper),
                );
            }
        }
        panic!("{:?} contains {:?}; there is no delta to describe", self, actual);
    }
}

fn ambiguous_boundary(int: &IntRangeConstraint, float: &FloatRangeConstraint) -> bool {
    let from_clash = !float.from_inclusive() && int.from() != i64::MIN && float.from() == int.from() as f64;
    let to_clash = !float.to_inclusive() && int.to() != i64::MAX && float.to() == int.to() as f64;
    from_clash || to_clash
}

fn escapes_below(allowed: &FloatRangeConstraint, actual: &FloatRangeConstraint) -> bool {
    actual.from() < allowed.from()
        || (actual.from() == allowed.from() && actual.from_inclusive() && !allowed.from_inclusive())
}

fn escapes_above(allowed: &FloatRangeConstraint, actual: &FloatRangeConstraint) -> bool {
    actual.to() > allowed.to()
        || (actual.to() == allowed.to() && actual.to_inclusive() && !allowed.to_inclusive())
}

/// `≥ 5` becomes `< 5`, `> 2.5` becomes `≤ 2.5` and so on
fn complement(bound: &str) -> String {
    let mut chars = bound.chars();
    let op = match chars.next() {
        Some('≥') => '<',
        Some('>') => '≤',
        Some('≤') => '>',
        Some('<') => '≥',
        _ => return bound.to_string(),
    };
    format!("{}{}", op, chars.as_str())
}

/// Builds "{allowed} must be {requirement} but {actual} can be {escape}".
/// Inferred actual ranges read "may be".
pub(crate) fn delta_message(
    allowed_label: &str,
    default_allowed: &str,
    requirement: &str,
    actual_label: &str,
    inferred: bool,
    escape: &str,
) -> String {
    let allowed = match allowed_label.trim() {
        "" => default_allowed.to_string(),
        label => capitalize(label),
    };
    let actual = match actual_label.trim() {
        "" => "it",
        label => label,
    };
    let verb = if inferred { "may be" } else { "can be" };
    format!("{} must be {} but {} {} {}", allowed, requirement, actual, verb, escape)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Formats a double the way the JVM prints it, so `7.0` keeps its fraction
pub(crate) fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
