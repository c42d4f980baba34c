//! Power-law curve `f(x) = a·(x + 1)^b`.

use trend_core::traits::CurveModel;

/// Power law evaluated on the index axis shifted by one.
///
/// With a negative exponent `0^b` is infinite, so index `i` is fitted and
/// forecast as `i + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerLaw;

impl CurveModel for PowerLaw {
    fn name(&self) -> &'static str {
        "power-law"
    }

    fn parameter_count(&self) -> usize {
        2
    }

    fn initial_guess(&self) -> Vec<f64> {
        vec![1.0, 1.0]
    }

    fn evaluate(&self, p: &[f64], x: f64) -> f64 {
        p[0] * (x + 1.0).powf(p[1])
    }

    fn gradient(&self, p: &[f64], x: f64, out: &mut [f64]) {
        let shifted = x + 1.0;
        let scale = shifted.powf(p[1]);
        out[0] = scale;
        out[1] = p[0] * scale * shifted.ln();
    }
}
