use std::cmp::Ordering;

use crate::constant::Const;

/// Three-way comparison treating values within `Const::APPROX_TOLERANCE` as
/// equal.
pub fn approx_compare(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= Const::APPROX_TOLERANCE {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

pub fn approx_zero(value: f64) -> bool {
    approx_compare(value, 0.0) == Ordering::Equal
}
