// Detectors built on the constraint and restriction types
//
// - range: values and ranges checked against an allowed range
// - private_api: reflective access checked against restriction data

mod private_api;
mod range;

pub use private_api::PrivateApiDetector;
pub use range::{Number, RangeDetector};
