//! Three-parameter logistic (3PL) response model.
//!
//! Discrimination and guessing are fixed process-wide; only the difficulty
//! `b` varies per item.

/// Discrimination parameter `a`.
pub const DISCRIMINATION: f64 = 1.0;
/// Guessing floor `c`.
pub const GUESSING: f64 = 0.25;

pub const PROBABILITY_FLOOR: f64 = 0.001;
pub const PROBABILITY_CEILING: f64 = 0.999;

pub const THETA_MIN: f64 = -3.0;
pub const THETA_MAX: f64 = 3.0;

/// Probability of a correct response at ability `theta` on an item of
/// difficulty `b`.
///
/// p = c + (1 - c) / (1 + exp(-a(θ - b)))
///
/// Clamped to [0.001, 0.999] so downstream ratios and logs stay finite.
pub fn probability(theta: f64, b: f64) -> f64 {
    let exponent = DISCRIMINATION * (theta - b);
    let p = GUESSING + (1.0 - GUESSING) / (1.0 + (-exponent).exp());
    p.clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING)
}

/// Fisher information of an item at ability `theta`.
///
/// I = a² q (p - c)² / (p (1 - c)²)
///
/// Only meaningful as a ranking signal between items.
pub fn information(theta: f64, b: f64) -> f64 {
    let p = probability(theta, b);
    let q = 1.0 - p;
    let numerator = DISCRIMINATION.powi(2) * q * (p - GUESSING).powi(2);
    let denominator = p * (1.0 - GUESSING).powi(2);
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Bound an ability estimate to [-3, 3].
pub fn clamp_theta(theta: f64) -> f64 {
    theta.clamp(THETA_MIN, THETA_MAX)
}
