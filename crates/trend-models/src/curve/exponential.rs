//! Exponential growth curve `f(x) = a·e^(b·x) + c`.

use trend_core::traits::CurveModel;

/// Exponential curve with an additive offset.
///
/// The solver starts from `(a, b, c) = (1, 0.01, 1)`, a gentle growth curve
/// that stays finite over multi-year daily series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exponential;

impl CurveModel for Exponential {
    fn name(&self) -> &'static str {
        "exponential"
    }

    fn parameter_count(&self) -> usize {
        3
    }

    fn initial_guess(&self) -> Vec<f64> {
        vec![1.0, 0.01, 1.0]
    }

    fn evaluate(&self, p: &[f64], x: f64) -> f64 {
        p[0] * (p[1] * x).exp() + p[2]
    }

    fn gradient(&self, p: &[f64], x: f64, out: &mut [f64]) {
        let growth = (p[1] * x).exp();
        out[0] = growth;
        out[1] = p[0] * x * growth;
        out[2] = 1.0;
    }
}
