//! Logarithmic curve `f(x) = a·ln(x + 1) + b`.

use trend_core::traits::CurveModel;

/// Logarithmic curve on the index axis shifted by one.
///
/// `ln(0)` is undefined, so the first observation sits at `ln(1) = 0`. The
/// same shift applies to every forecast index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Logarithmic;

impl CurveModel for Logarithmic {
    fn name(&self) -> &'static str {
        "logarithmic"
    }

    fn parameter_count(&self) -> usize {
        2
    }

    fn initial_guess(&self) -> Vec<f64> {
        vec![1.0, 1.0]
    }

    fn evaluate(&self, p: &[f64], x: f64) -> f64 {
        p[0] * (x + 1.0).ln() + p[1]
    }

    fn gradient(&self, _p: &[f64], x: f64, out: &mut [f64]) {
        out[0] = (x + 1.0).ln();
        out[1] = 1.0;
    }
}
