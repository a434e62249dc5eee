//! Maximum-likelihood ability estimation.
//!
//! A fixed-iteration Newton-Raphson refinement of θ from a response history.
//! The iteration count is part of the contract: callers reproduce exact
//! trajectories, so there is no convergence-based stopping.

use crate::bank::ItemBank;
use crate::irt::{clamp_theta, information, probability, DISCRIMINATION, GUESSING};
use crate::model::ItemResponse;

/// Number of Newton-Raphson passes.
pub const NEWTON_ITERATIONS: usize = 10;

/// Below this absolute second-derivative accumulator the likelihood is
/// treated as flat and iteration stops.
pub const FLAT_LIKELIHOOD_EPSILON: f64 = 1e-5;

/// Largest change applied to θ in a single pass.
pub const MAX_STEP: f64 = 0.5;

/// Estimate ability from `theta0` and a response history.
///
/// An empty history returns 0.0 regardless of `theta0`. Responses whose item
/// is not in `bank` are skipped. The result always lies in [-3, 3].
pub fn estimate_ability(theta0: f64, responses: &[ItemResponse], bank: &ItemBank) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }

    let known: Vec<(f64, f64)> = responses
        .iter()
        .filter_map(|r| match bank.get(&r.id) {
            Some(item) => Some((item.difficulty_b, if r.correct { 1.0 } else { 0.0 })),
            None => {
                tracing::debug!(item_id = %r.id, "response references unknown item, skipping");
                None
            }
        })
        .collect();

    let mut theta = theta0;
    for iteration in 0..NEWTON_ITERATIONS {
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for &(b, u) in &known {
            let p = probability(theta, b);
            let p_star = (p - GUESSING) / (1.0 - GUESSING);
            let w = p_star * (1.0 - p_star);
            numerator += DISCRIMINATION * (u - p) * p_star / p;
            denominator -= DISCRIMINATION.powi(2) * w;
        }

        if denominator.abs() < FLAT_LIKELIHOOD_EPSILON {
            tracing::trace!(iteration, theta, "flat likelihood, stopping");
            break;
        }

        let step = (numerator / denominator.abs()).clamp(-MAX_STEP, MAX_STEP);
        theta = clamp_theta(theta + step);
        tracing::trace!(iteration, theta, numerator, denominator, "newton step");
    }

    // An out-of-range starting point survives an immediate flat-likelihood stop.
    clamp_theta(theta)
}

/// Standard error of measurement at `theta` given the answered items.
///
/// 1 / sqrt(Σ I(θ, b)) over the responses that reference known items, or
/// `None` when that total information is zero.
pub fn standard_error(theta: f64, responses: &[ItemResponse], bank: &ItemBank) -> Option<f64> {
    let total: f64 = responses
        .iter()
        .filter_map(|r| bank.get(&r.id))
        .map(|item| information(theta, item.difficulty_b))
        .sum();
    if total > 0.0 {
        Some(1.0 / total.sqrt())
    } else {
        None
    }
}
