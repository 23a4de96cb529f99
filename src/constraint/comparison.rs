//! Constraints implied by comparisons
//!
//! Turns `SDK_INT` checks (`SDK_INT >= 21`, `21 <= SDK_INT`,
//! `SDK_INT in 21..25`) into [`ApiConstraint`]s, and comparisons on a
//! numeric variable (`if (x > 10)`) into inferred range constraints.

use super::api::{ApiConstraint, INFINITY};
use super::float_range::FloatRangeConstraint;
use super::int_range::IntRangeConstraint;
use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
    Equals,
    NotEquals,
}

impl Comparison {
    /// The operator to use when the operands are swapped (`a < b` is `b > a`)
    pub fn flip(self) -> Comparison {
        match self {
            Comparison::Less => Comparison::Greater,
            Comparison::LessOrEquals => Comparison::GreaterOrEquals,
            Comparison::Greater => Comparison::Less,
            Comparison::GreaterOrEquals => Comparison::LessOrEquals,
            Comparison::Equals => Comparison::Equals,
            Comparison::NotEquals => Comparison::NotEquals,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::LessOrEquals => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterOrEquals => ">=",
            Comparison::Equals => "==",
            Comparison::NotEquals => "!=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<" => Ok(Comparison::Less),
            "<=" | "≤" => Ok(Comparison::LessOrEquals),
            ">" => Ok(Comparison::Greater),
            ">=" | "≥" => Ok(Comparison::GreaterOrEquals),
            "==" | "===" => Ok(Comparison::Equals),
            "!=" | "!==" => Ok(Comparison::NotEquals),
            other => Err(Error::expression(other, "unknown comparison operator")),
        }
    }
}

/// Constraint guaranteed inside `if (SDK_INT <op> level)`.
///
/// `!=` has no single-interval representation and yields `None`.
pub fn sdk_int_constraint(op: Comparison, level: u32) -> Option<ApiConstraint> {
    if level >= INFINITY {
        return None;
    }
    match op {
        Comparison::GreaterOrEquals => Some(ApiConstraint::at_least(level)),
        Comparison::Greater => Some(ApiConstraint::above(level)),
        Comparison::LessOrEquals => Some(ApiConstraint::at_most(level)),
        Comparison::Less => Some(ApiConstraint::below(level)),
        Comparison::Equals => Some(ApiConstraint::same(level)),
        Comparison::NotEquals => None,
    }
}

/// Constraint for `SDK_INT in from..to` (`inclusive_end`) or
/// `SDK_INT in from until to`
pub fn sdk_int_range(from: u32, to: u32, inclusive_end: bool) -> Option<ApiConstraint> {
    let to = if inclusive_end { to.checked_add(1)? } else { to };
    let from = from.max(1);
    if from >= INFINITY || to > INFINITY || from > to {
        return None;
    }
    Some(ApiConstraint::range(from, to))
}

fn range_expression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:Build\.VERSION\.)?SDK_INT\s+)?in\s+(\d+)\s*(\.\.|until)\s*(\d+)$")
            .expect("Invalid range expression regex")
    })
}

fn sdk_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:Build\.VERSION\.)?SDK_INT)?\s*(<=|>=|==|!=|<|>|≤|≥)\s*(\d+)$")
            .expect("Invalid comparison regex")
    })
}

fn sdk_last_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)\s*(<=|>=|==|!=|<|>|≤|≥)\s*(?:Build\.VERSION\.)?SDK_INT$")
            .expect("Invalid reversed comparison regex")
    })
}

fn parse_level(expression: &str, digits: &str) -> Result<u32> {
    let level: u32 = digits
        .parse()
        .map_err(|_| Error::expression(expression, format!("`{}` is not an API level", digits)))?;
    if level >= INFINITY {
        return Err(Error::expression(
            expression,
            format!("API level {} is out of range", level),
        ));
    }
    Ok(level)
}

/// Parses the condition of an `SDK_INT` check into the constraint it
/// guarantees.
///
/// Accepted forms: `>= 21`, `SDK_INT < 26`, `Build.VERSION.SDK_INT == 24`,
/// `21 <= SDK_INT`, `in 21..25`, `SDK_INT in 21 until 26`, `all`, `nothing`.
pub fn parse_api_expression(expression: &str) -> Result<ApiConstraint> {
    let text = expression.trim();
    match text.to_ascii_lowercase().as_str() {
        "all" | "any" => return Ok(ApiConstraint::ALL),
        "nothing" | "none" => return Ok(ApiConstraint::NOTHING),
        _ => {}
    }

    if let Some(caps) = range_expression_re().captures(text) {
        let from = parse_level(expression, &caps[1])?;
        let to = parse_level(expression, &caps[3])?;
        let inclusive = &caps[2] == "..";
        return sdk_int_range(from, to, inclusive)
            .ok_or_else(|| Error::expression(expression, "range start is after its end"));
    }

    let (op, level) = if let Some(caps) = sdk_first_re().captures(text) {
        (caps[1].parse::<Comparison>()?, parse_level(expression, &caps[2])?)
    } else if let Some(caps) = sdk_last_re().captures(text) {
        (caps[2].parse::<Comparison>()?.flip(), parse_level(expression, &caps[1])?)
    } else {
        return Err(Error::expression(expression, "not an SDK_INT comparison"));
    };

    sdk_int_constraint(op, level)
        .ok_or_else(|| Error::expression(expression, "`!=` cannot be expressed as a single range"))
}

/// Range implied for a variable inside `if (x <op> value)`.
///
/// Integers are discrete, so strict comparisons narrow by one: `x > 10`
/// yields `≥ 11` and `x < 10` yields `≤ 9`. The bound itself is never kept
/// as an exclusive endpoint.
///
/// `!=` can only trim an endpoint off a `previous` range; ranges stay
/// contiguous.
pub fn infer_int_range(
    op: Comparison,
    value: i64,
    previous: Option<&IntRangeConstraint>,
) -> Option<IntRangeConstraint> {
    if value == i64::MIN || value == i64::MAX {
        return None;
    }
    let constraint = match op {
        Comparison::Greater => IntRangeConstraint::at_least(value + 1),
        Comparison::GreaterOrEquals => IntRangeConstraint::at_least(value),
        Comparison::Less => IntRangeConstraint::at_most(value - 1),
        Comparison::LessOrEquals => IntRangeConstraint::at_most(value),
        Comparison::Equals => IntRangeConstraint::range(value, value),
        Comparison::NotEquals => {
            let previous = previous?;
            if previous.from() == value {
                IntRangeConstraint::range(value + 1, previous.to())
            } else if previous.to() == value {
                IntRangeConstraint::range(previous.from(), value - 1)
            } else {
                return None;
            }
        }
    };
    Some(constraint.with_inferred(true))
}

pub fn infer_float_range(op: Comparison, value: f64) -> Option<FloatRangeConstraint> {
    if !value.is_finite() {
        return None;
    }
    let constraint = match op {
        Comparison::Greater => FloatRangeConstraint::greater_than(value),
        Comparison::GreaterOrEquals => FloatRangeConstraint::at_least(value),
        Comparison::Less => FloatRangeConstraint::less_than(value),
        Comparison::LessOrEquals => FloatRangeConstraint::at_most(value),
        Comparison::Equals => FloatRangeConstraint::range(value, value),
        Comparison::NotEquals => return None,
    };
    Some(constraint.with_inferred(true))
}
