//! Distribution primitives used by the equation catalog.
//!
//! All functions are total: arguments outside a distribution's domain (including the
//! placeholders fed in during probing) give `NaN` rather than an error or a panic.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Above this many degrees of freedom the t distribution is evaluated through normal
/// expansions. `StudentsT` drifts past ~1e6 and stops returning past ~1e7.
const LARGE_DF: f64 = 1e4;

/// Inverse CDF of the standard Student's t distribution with `df` degrees of freedom.
pub fn t_inv(p: f64, df: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    if df > LARGE_DF {
        return cornish_fisher_t(normal_inv(p), df);
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Two-sided p-value of a t statistic.
pub fn t_test_two_sided(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    if df > LARGE_DF {
        let z = t.abs() * (1.0 - 1.0 / (4.0 * df)) / (1.0 + t * t / (2.0 * df)).sqrt();
        return (2.0 * (1.0 - standard_normal_cdf(z))).min(1.0);
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).min(1.0),
        Err(_) => f64::NAN,
    }
}

fn normal_inv(p: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Second-order Cornish-Fisher expansion of a t quantile around the normal quantile `z`.
/// Reduces to `z` as `df` goes to infinity.
fn cornish_fisher_t(z: f64, df: f64) -> f64 {
    let z3 = z.powi(3);
    let z5 = z.powi(5);
    z + (z3 + z) / (4.0 * df) + (5.0 * z5 + 16.0 * z3 + 3.0 * z) / (96.0 * df * df)
}

/// Two-sided critical value for confidence `level`, i.e. `t_inv((1 + level) / 2, df)`.
pub fn t_critical(level: f64, df: f64) -> f64 {
    t_inv((1.0 + level) / 2.0, df)
}

pub fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.cdf(x),
        Err(_) => f64::NAN,
    }
}
