//! lintconstraints - constraint types for Android lint tooling
//!
//! This library provides the value types lint checks reason with, and the
//! hidden API restriction index they consult.
//!
//! # Architecture
//!
//! 1. **Constraints** - API level intervals guaranteed by `SDK_INT` checks,
//!    and `@IntRange` / `@FloatRange` / `@Size` ranges
//! 2. **Restrictions** - text ingestion into a sorted binary index, cached
//!    on disk and shared read-only between threads
//! 3. **Analysis** - detectors turning constraints and restrictions into
//!    findings
//! 4. **Reporting** - terminal and JSON output

pub mod analysis;
pub mod config;
pub mod constraint;
pub mod error;
pub mod report;
pub mod restriction;

pub use analysis::{Finding, Issue, Number, PrivateApiDetector, RangeDetector, Severity};
pub use config::Config;
pub use constraint::{
    parse_api_expression, ApiConstraint, Comparison, FloatRangeConstraint, IntRangeConstraint,
    RangeConstraint, SizeConstraint,
};
pub use error::{Error, Result};
pub use report::{ReportFormat, Reporter};
pub use restriction::{MemberRef, PrivateApiLookup, Restriction, RestrictionCache, RestrictionParser};
