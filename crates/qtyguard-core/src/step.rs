//! # Step Arithmetic
//!
//! Checks whether a quantity lands on a step boundary.
//!
//! ## The Floating Point Problem
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0.3 % 0.1 = 0.09999999999999998   ❌ looks like "not a multiple"      │
//! │                                                                         │
//! │  fmod_round(0.3, 0.1):                                                  │
//! │    0.3 / 0.1 = 2.9999999999999996 → round → 3                           │
//! │    0.3 - 3 × 0.1 = -5.5e-17        → round to 4 places → 0  ✅          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::STEP_TOLERANCE_DECIMALS;

/// Rounds `value` to `decimals` decimal places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Remainder of `x` against the nearest multiple of `y`, rounded to
/// [`STEP_TOLERANCE_DECIMALS`].
///
/// The result may be negative when `x` sits just below a multiple.
/// Callers only compare it against zero.
pub fn fmod_round(x: f64, y: f64) -> f64 {
    let nearest = (x / y).round();
    round_to(x - nearest * y, STEP_TOLERANCE_DECIMALS)
}

/// True when `remainder` is a whole number of `step`s.
///
/// Steps below one are compared in units of the step, so the tolerance
/// shrinks with it. A zero, negative or non-finite step carries no
/// constraint.
pub fn is_multiple(remainder: f64, step: f64) -> bool {
    if !step.is_finite() || step <= 0.0 {
        return true;
    }
    let unit = step.min(1.0);
    fmod_round(remainder / unit, step / unit) == 0.0
}
