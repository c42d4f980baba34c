//! Core trait definitions for curve models.
//!
//! Nonlinear curve families implement [`CurveModel`] so that a single solver
//! can fit all of them. Each implementation supplies its own closed form,
//! parameter gradient and initial guess; the solver owns iteration limits and
//! failure handling.

/// A parametric curve `f(x; p)` fitted by nonlinear least squares.
///
/// `x` is always the raw series index (`0, 1, 2, ...`). Families that are
/// undefined at zero apply their own shift inside [`evaluate`](Self::evaluate)
/// and [`gradient`](Self::gradient), so fitted values and forecasts share the
/// same axis convention.
///
/// # Example Implementation
///
/// ```rust
/// use trend_core::CurveModel;
///
/// struct Line;
///
/// impl CurveModel for Line {
///     fn name(&self) -> &'static str { "line" }
///     fn parameter_count(&self) -> usize { 2 }
///     fn initial_guess(&self) -> Vec<f64> { vec![1.0, 0.0] }
///     fn evaluate(&self, p: &[f64], x: f64) -> f64 { p[0] * x + p[1] }
///     fn gradient(&self, _p: &[f64], x: f64, out: &mut [f64]) {
///         out[0] = x;
///         out[1] = 1.0;
///     }
/// }
///
/// assert_eq!(Line.evaluate(&[2.0, 1.0], 3.0), 7.0);
/// ```
pub trait CurveModel: Send + Sync {
    /// Name of the curve family, used in error messages.
    fn name(&self) -> &'static str;

    /// Number of free parameters.
    fn parameter_count(&self) -> usize;

    /// Starting point for the solver.
    ///
    /// Must return exactly [`parameter_count`](Self::parameter_count) values.
    fn initial_guess(&self) -> Vec<f64>;

    /// Evaluate the curve at index `x`.
    fn evaluate(&self, params: &[f64], x: f64) -> f64;

    /// Write `∂f/∂p_j` at index `x` into `out[j]`.
    fn gradient(&self, params: &[f64], x: f64, out: &mut [f64]);

    /// Minimum number of observations for a determined fit.
    fn min_points(&self) -> usize {
        self.parameter_count()
    }

    /// Evaluate the curve over a whole axis.
    fn evaluate_all(&self, params: &[f64], axis: &[f64]) -> Vec<f64> {
        axis.iter().map(|&x| self.evaluate(params, x)).collect()
    }
}
