//! Standard normal distribution.
//!
//! One shared CDF for pricing, probability and implied volatility so the
//! three paths never disagree on precision.

use std::f64::consts::{PI, SQRT_2};

// Abramowitz & Stegun 7.1.26 coefficients (max absolute erf error 1.5e-7).
const P: f64 = 0.327_591_1;
const A1: f64 = 0.254_829_592;
const A2: f64 = -0.284_496_736;
const A3: f64 = 1.421_413_741;
const A4: f64 = -1.453_152_027;
const A5: f64 = 1.061_405_429;

/// Polynomial approximation of `erf(z)` for `z >= 0`.
fn erf_non_negative(z: f64) -> f64 {
    let t = 1.0 / P.mul_add(z, 1.0);
    let poly = A5.mul_add(t, A4).mul_add(t, A3).mul_add(t, A2).mul_add(t, A1) * t;
    poly.mul_add(-(-z * z).exp(), 1.0)
}

/// Standard normal CDF.
///
/// Evaluated on `|x|` and reflected, so `norm_cdf(0.0) == 0.5` and
/// `norm_cdf(x) + norm_cdf(-x) == 1.0` up to rounding.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return 0.5;
    }
    let upper = 0.5 * (1.0 + erf_non_negative(x.abs() / SQRT_2));
    if x >= 0.0 { upper } else { 1.0 - upper }
}

/// Standard normal PDF.
#[must_use]
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}
