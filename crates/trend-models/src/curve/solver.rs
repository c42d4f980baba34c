//! Levenberg–Marquardt solver shared by every nonlinear curve family.
//!
//! The solver minimizes `½ Σ (f(x_i; p) - y_i)²` starting from the model's
//! initial guess. Each trial point costs one function evaluation; exceeding
//! the evaluation cap is a hard failure and no partially converged parameters
//! are returned.
//!
//! Termination mirrors MINPACK's `lmdif` tests:
//! - the gradient infinity-norm drops to `gtol`,
//! - an accepted step reduces the cost by no more than `ftol` relative,
//! - the step length drops below `xtol` relative to the parameter norm.

use tracing::{debug, trace};
use trend_core::{
    error::{Result, TrendError},
    traits::CurveModel,
    utils::{l2_norm, max_abs, solve_linear_system},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default relative tolerance for cost reduction and step length.
pub const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e16;
const DAMPING_FACTOR: f64 = 10.0;
const DIAGONAL_FLOOR: f64 = 1e-12;

/// Configuration for the nonlinear least-squares solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Maximum number of function evaluations. `None` uses `200 * (params + 1)`.
    pub max_evaluations: Option<usize>,
    /// Relative cost-reduction tolerance.
    pub ftol: f64,
    /// Relative step-length tolerance.
    pub xtol: f64,
    /// Gradient infinity-norm tolerance.
    pub gtol: f64,
    /// Starting Marquardt damping.
    pub initial_damping: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_evaluations: None,
            ftol: DEFAULT_TOLERANCE,
            xtol: DEFAULT_TOLERANCE,
            gtol: 0.0,
            initial_damping: 1e-3,
        }
    }
}

impl SolverConfig {
    /// Create a solver configuration with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit evaluation cap.
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = Some(max_evaluations);
        self
    }

    /// Set both the cost and step tolerances.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.ftol = tolerance;
        self.xtol = tolerance;
        self
    }

    /// Evaluation cap for a model with `parameter_count` parameters.
    pub fn evaluation_cap(&self, parameter_count: usize) -> usize {
        self.max_evaluations
            .unwrap_or(200 * (parameter_count + 1))
    }

    /// Check every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::InvalidParameter`] naming the first bad setting.
    pub fn validate(&self) -> Result<()> {
        if self.max_evaluations == Some(0) {
            return Err(TrendError::InvalidParameter {
                name: "max_evaluations",
                value: "0".to_string(),
                expected: "at least 1",
            });
        }
        let tolerances = [("ftol", self.ftol), ("xtol", self.xtol), ("gtol", self.gtol)];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(TrendError::InvalidParameter {
                    name,
                    value: value.to_string(),
                    expected: "finite and non-negative",
                });
            }
        }
        if !self.initial_damping.is_finite() || self.initial_damping <= 0.0 {
            return Err(TrendError::InvalidParameter {
                name: "initial_damping",
                value: self.initial_damping.to_string(),
                expected: "finite and positive",
            });
        }
        Ok(())
    }
}

/// Which convergence test stopped the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// Gradient norm fell to `gtol`.
    Gradient,
    /// Relative cost reduction fell to `ftol`.
    Cost,
    /// Relative step length fell to `xtol`.
    Step,
}

/// Converged parameters and solver bookkeeping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveSolution {
    /// Fitted parameters, in the model's order.
    pub params: Vec<f64>,
    /// Function evaluations spent.
    pub evaluations: usize,
    /// Final half sum of squared residuals.
    pub cost: f64,
    /// Convergence test that ended the iteration.
    pub termination: Termination,
}

fn half_squared_cost(model: &dyn CurveModel, params: &[f64], x: &[f64], y: &[f64]) -> f64 {
    let sum: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r = model.evaluate(params, xi) - yi;
            r * r
        })
        .sum();
    0.5 * sum
}

/// Normal equations `JᵀJ` and gradient `Jᵀr` at `params`.
fn normal_equations(
    model: &dyn CurveModel,
    params: &[f64],
    x: &[f64],
    y: &[f64],
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let k = params.len();
    let mut jtj = vec![vec![0.0; k]; k];
    let mut jtr = vec![0.0; k];
    let mut row = vec![0.0; k];

    for (&xi, &yi) in x.iter().zip(y) {
        let r = model.evaluate(params, xi) - yi;
        model.gradient(params, xi, &mut row);
        for i in 0..k {
            jtr[i] += row[i] * r;
            for j in 0..k {
                jtj[i][j] += row[i] * row[j];
            }
        }
    }

    (jtj, jtr)
}

/// Fit `model` to `(x, y)` by Levenberg–Marquardt.
///
/// # Errors
///
/// - [`TrendError::LengthMismatch`] if `x` and `y` differ in length.
/// - [`TrendError::InsufficientData`] if there are fewer points than the model
///   needs; the solver is not started.
/// - [`TrendError::NonConvergence`] if the initial guess is not evaluable, the
///   evaluation cap is reached, damping diverges, or the result is not finite.
pub fn levenberg_marquardt(
    model: &dyn CurveModel,
    x: &[f64],
    y: &[f64],
    config: &SolverConfig,
) -> Result<CurveSolution> {
    if x.len() != y.len() {
        return Err(TrendError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if y.len() < model.min_points() {
        return Err(TrendError::InsufficientData {
            model: model.name(),
            required: model.min_points(),
            actual: y.len(),
        });
    }

    let mut params = model.initial_guess();
    debug_assert_eq!(params.len(), model.parameter_count());
    let cap = config.evaluation_cap(params.len());

    let mut cost = half_squared_cost(model, &params, x, y);
    let mut evaluations = 1;
    if !cost.is_finite() {
        return Err(TrendError::non_convergence(
            model.name(),
            "initial guess produces non-finite residuals",
        ));
    }

    let mut damping = config.initial_damping;

    let termination = 'outer: loop {
        let (jtj, jtr) = normal_equations(model, &params, x, y);
        if max_abs(&jtr) <= config.gtol {
            break Termination::Gradient;
        }
        let rhs: Vec<f64> = jtr.iter().map(|g| -g).collect();

        loop {
            if evaluations >= cap {
                return Err(TrendError::non_convergence(
                    model.name(),
                    format!("evaluation cap of {cap} reached"),
                ));
            }

            let mut damped = jtj.clone();
            for (i, row) in damped.iter_mut().enumerate() {
                row[i] += damping * jtj[i][i].max(DIAGONAL_FLOOR);
            }

            let Some(step) = solve_linear_system(&damped, &rhs) else {
                damping *= DAMPING_FACTOR;
                if damping > MAX_DAMPING {
                    return Err(TrendError::non_convergence(
                        model.name(),
                        "damped normal equations are singular",
                    ));
                }
                continue;
            };

            let candidate: Vec<f64> = params.iter().zip(&step).map(|(p, s)| p + s).collect();
            let candidate_cost = half_squared_cost(model, &candidate, x, y);
            evaluations += 1;

            let small_step = l2_norm(&step) <= config.xtol * (l2_norm(&params) + config.xtol);

            if candidate_cost.is_finite() && candidate_cost < cost {
                let reduction = cost - candidate_cost;
                let previous = cost;
                params = candidate;
                cost = candidate_cost;
                damping = (damping / DAMPING_FACTOR).max(MIN_DAMPING);
                trace!(model = model.name(), evaluations, cost, "accepted step");

                if reduction <= config.ftol * previous {
                    break 'outer Termination::Cost;
                }
                if small_step {
                    break 'outer Termination::Step;
                }
                continue 'outer;
            }

            damping *= DAMPING_FACTOR;
            if small_step {
                break 'outer Termination::Step;
            }
            if damping > MAX_DAMPING {
                return Err(TrendError::non_convergence(model.name(), "damping diverged"));
            }
        }
    };

    if params.iter().any(|p| !p.is_finite()) {
        return Err(TrendError::non_convergence(
            model.name(),
            "solver produced non-finite parameters",
        ));
    }

    debug!(
        model = model.name(),
        evaluations,
        cost,
        ?termination,
        "curve fit converged"
    );

    Ok(CurveSolution {
        params,
        evaluations,
        cost,
        termination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Line;

    impl CurveModel for Line {
        fn name(&self) -> &'static str {
            "line"
        }
        fn parameter_count(&self) -> usize {
            2
        }
        fn initial_guess(&self) -> Vec<f64> {
            vec![0.0, 0.0]
        }
        fn evaluate(&self, p: &[f64], x: f64) -> f64 {
            p[0] * x + p[1]
        }
        fn gradient(&self, _p: &[f64], x: f64, out: &mut [f64]) {
            out[0] = x;
            out[1] = 1.0;
        }
    }

    struct Unbounded;

    impl CurveModel for Unbounded {
        fn name(&self) -> &'static str {
            "unbounded"
        }
        fn parameter_count(&self) -> usize {
            1
        }
        fn initial_guess(&self) -> Vec<f64> {
            vec![f64::MAX]
        }
        fn evaluate(&self, p: &[f64], x: f64) -> f64 {
            p[0] * p[0] * x
        }
        fn gradient(&self, p: &[f64], x: f64, out: &mut [f64]) {
            out[0] = 2.0 * p[0] * x;
        }
    }

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.max_evaluations, None);
        assert_eq!(config.evaluation_cap(3), 800);
        assert_eq!(config.evaluation_cap(2), 600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(SolverConfig::new().with_max_evaluations(0).validate().is_err());
        assert!(SolverConfig::new().with_tolerance(-1.0).validate().is_err());
        assert!(SolverConfig::new().with_tolerance(f64::NAN).validate().is_err());

        let config = SolverConfig {
            initial_damping: 0.0,
            ..SolverConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            TrendError::InvalidParameter {
                name: "initial_damping",
                ..
            }
        ));
    }

    #[test]
    fn test_fits_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let solution = levenberg_marquardt(&Line, &x, &y, &SolverConfig::default()).unwrap();
        assert_relative_eq!(solution.params[0], 2.0, epsilon = 1e-8);
        assert_relative_eq!(solution.params[1], 1.0, epsilon = 1e-8);
        assert!(solution.cost < 1e-12);
        assert!(solution.evaluations > 1);
    }

    #[test]
    fn test_too_few_points_fails_before_solving() {
        let err = levenberg_marquardt(&Line, &[0.0], &[1.0], &SolverConfig::default()).unwrap_err();
        assert_eq!(
            err,
            TrendError::InsufficientData {
                model: "line",
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_length_mismatch() {
        let err = levenberg_marquardt(&Line, &[0.0, 1.0], &[1.0], &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, TrendError::LengthMismatch { x_len: 2, y_len: 1 }));
    }

    #[test]
    fn test_non_finite_initial_guess() {
        let err = levenberg_marquardt(&Unbounded, &[1.0, 2.0], &[1.0, 2.0], &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, TrendError::NonConvergence { model: "unbounded", .. }));
    }

    #[test]
    fn test_evaluation_cap() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let config = SolverConfig::new().with_max_evaluations(1);
        let err = levenberg_marquardt(&Line, &x, &y, &config).unwrap_err();
        assert_eq!(
            err,
            TrendError::non_convergence("line", "evaluation cap of 1 reached")
        );
    }
}
