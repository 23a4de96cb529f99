// Constraint module
//
// Value types describing what a piece of code may assume:
// - api: API levels guaranteed by SDK_INT checks (half-open intervals)
// - int_range / float_range / size: @IntRange, @FloatRange and @Size ranges
// - range: the three numeric kinds behind one type
// - comparison: constraints implied by comparison expressions

mod api;
mod comparison;
mod float_range;
mod int_range;
mod range;
mod size;

pub use api::{ApiConstraint, INFINITY};
pub use comparison::{
    infer_float_range, infer_int_range, parse_api_expression, sdk_int_constraint, sdk_int_range,
    Comparison,
};
pub use float_range::FloatRangeConstraint;
pub use int_range::IntRangeConstraint;
pub use range::RangeConstraint;
pub use size::SizeConstraint;
