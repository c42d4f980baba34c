//! Trend engine: fit a model kind to a series and extrapolate it.
//!
//! The engine validates its inputs, looks up the model kind in the strategy
//! table and runs the matching fit routine. Every kind produces the same three
//! outputs:
//!
//! - `fitted`: the model at each observed index,
//! - `extended`: the model over `0..n+horizon`, whose first `n` values equal
//!   `fitted` when `x` is the default index axis,
//! - `forecast`: `extended[n..]`.

use std::iter;

use tracing::debug;
use trend_core::{
    error::{Result, TrendError},
    series::{ensure_finite, index_axis},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::curve::{levenberg_marquardt, SolverConfig};
use crate::kind::{ModelKind, Strategy};
use crate::regression::polyfit;
use crate::smoothing::{centered_moving_average, EdgePolicy, MovingAverageConfig};

/// Configuration for the trend engine.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Settings for the nonlinear solver.
    pub solver: SolverConfig,
    /// Settings for the moving-average trend.
    pub moving_average: MovingAverageConfig,
}

impl EngineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the solver configuration.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Set the moving-average configuration.
    pub fn with_moving_average(mut self, moving_average: MovingAverageConfig) -> Self {
        self.moving_average = moving_average;
        self
    }

    /// Set the moving-average edge policy.
    pub fn with_edge_policy(mut self, edge: EdgePolicy) -> Self {
        self.moving_average.edge = edge;
        self
    }

    /// Check every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::InvalidParameter`] naming the first bad setting.
    pub fn validate(&self) -> Result<()> {
        self.solver.validate()?;
        self.moving_average.validate()
    }
}

/// Parameters of a fitted trend.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "snake_case"))]
pub enum FitParameters {
    /// Polynomial coefficients, highest degree first.
    Polynomial {
        /// Coefficients padded to `degree + 1` entries.
        coefficients: Vec<f64>,
    },
    /// Nonlinear curve parameters in the model's order.
    Curve {
        /// Converged parameters.
        params: Vec<f64>,
        /// Solver function evaluations spent.
        evaluations: usize,
    },
    /// Moving-average settings used.
    MovingAverage {
        /// Window length.
        window: usize,
        /// Edge convention.
        edge: EdgePolicy,
    },
}

/// Result of fitting and extrapolating one series.
///
/// Only the engine builds these, so `extended` always holds at least
/// `observations` values. Serialization is one-way.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TrendFit {
    kind: ModelKind,
    parameters: FitParameters,
    fitted: Vec<f64>,
    extended: Vec<f64>,
    observations: usize,
}

impl TrendFit {
    /// Model kind that produced this fit.
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Fitted parameters.
    pub fn parameters(&self) -> &FitParameters {
        &self.parameters
    }

    /// Model value at each observed index.
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Model value over the full axis `0..n+horizon`.
    pub fn extended(&self) -> &[f64] {
        &self.extended
    }

    /// Model value at the future indices `n..n+horizon`.
    pub fn forecast(&self) -> &[f64] {
        &self.extended[self.observations..]
    }

    /// Number of observations the model was fitted to.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Number of forecast periods.
    pub fn horizon(&self) -> usize {
        self.extended.len() - self.observations
    }

    /// Observed minus fitted value at each index.
    pub fn residuals(&self, observed: &[f64]) -> Vec<f64> {
        observed
            .iter()
            .zip(&self.fitted)
            .map(|(y, f)| y - f)
            .collect()
    }

    /// Consume the fit, returning `(fitted, extended)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.fitted, self.extended)
    }
}

/// Fits model kinds to observation series.
///
/// The engine holds only configuration; every call is independent, so one
/// engine can serve concurrent requests.
///
/// # Example
///
/// ```rust
/// use trend_models::prelude::*;
///
/// let engine = TrendEngine::default();
/// let fit = engine.fit_series(&[1.0, 2.0, 3.0, 4.0, 5.0], ModelKind::Linear, 3)?;
///
/// assert_eq!(fit.fitted().len(), 5);
/// assert_eq!(fit.forecast().len(), 3);
/// assert!((fit.forecast()[0] - 6.0).abs() < 1e-9);
/// # Ok::<(), TrendError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrendEngine {
    config: EngineConfig,
}

impl TrendEngine {
    /// Create an engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::InvalidParameter`] if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fit `kind` to `y` on the index axis `0..n` and extrapolate `horizon`
    /// periods.
    ///
    /// # Errors
    ///
    /// See [`fit_and_forecast`](Self::fit_and_forecast).
    pub fn fit_series(&self, y: &[f64], kind: ModelKind, horizon: usize) -> Result<TrendFit> {
        let x = index_axis(y.len());
        self.fit_and_forecast(&x, y, kind, horizon)
    }

    /// Parse `kind` and fit it to `y`.
    ///
    /// The name is checked before the series, so an unknown kind is reported
    /// as a configuration error even for an empty series.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::UnknownModel`] for an unrecognized name, otherwise
    /// see [`fit_and_forecast`](Self::fit_and_forecast).
    pub fn fit_named(&self, y: &[f64], kind: &str, horizon: usize) -> Result<TrendFit> {
        let kind: ModelKind = kind.parse()?;
        self.fit_series(y, kind, horizon)
    }

    /// Fit `kind` to `(x, y)` and extrapolate `horizon` periods.
    ///
    /// Fitted values are evaluated at `x`; the extended series is always
    /// evaluated on the index axis `0..n+horizon`.
    ///
    /// # Errors
    ///
    /// - [`TrendError::LengthMismatch`] if `x` and `y` differ in length.
    /// - [`TrendError::InsufficientData`] if `y` is shorter than the kind
    ///   requires (every kind requires at least one point).
    /// - [`TrendError::NonFiniteObservation`] for NaN or infinite inputs.
    /// - [`TrendError::InvalidParameter`] if `n + horizon` overflows.
    /// - [`TrendError::NonConvergence`] if a nonlinear fit fails or the fitted
    ///   curve is not finite over the extended axis.
    pub fn fit_and_forecast(
        &self,
        x: &[f64],
        y: &[f64],
        kind: ModelKind,
        horizon: usize,
    ) -> Result<TrendFit> {
        if x.len() != y.len() {
            return Err(TrendError::LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }

        let n = y.len();
        let required = kind.min_points();
        if n < required {
            return Err(TrendError::InsufficientData {
                model: kind.as_str(),
                required,
                actual: n,
            });
        }
        ensure_finite(y)?;
        ensure_finite(x)?;

        let strategy = kind.strategy();
        debug!(%kind, ?strategy, observations = n, horizon, "fitting trend");

        let len = n.checked_add(horizon).ok_or_else(|| TrendError::InvalidParameter {
            name: "horizon",
            value: horizon.to_string(),
            expected: "observations plus horizon within usize",
        })?;
        let axis = index_axis(len);
        let (parameters, fitted, extended) = match strategy {
            Strategy::Polynomial { degree } => {
                let poly = polyfit(x, y, degree)?;
                (
                    FitParameters::Polynomial {
                        coefficients: poly.padded_coefficients(degree),
                    },
                    poly.evaluate_all(x),
                    poly.evaluate_all(&axis),
                )
            }
            Strategy::Curve(model) => {
                let solution = levenberg_marquardt(model, x, y, &self.config.solver)?;
                let fitted = model.evaluate_all(&solution.params, x);
                let extended = model.evaluate_all(&solution.params, &axis);
                if fitted.iter().chain(&extended).any(|v| !v.is_finite()) {
                    return Err(TrendError::non_convergence(
                        model.name(),
                        "fitted curve is not finite over the forecast axis",
                    ));
                }
                (
                    FitParameters::Curve {
                        params: solution.params,
                        evaluations: solution.evaluations,
                    },
                    fitted,
                    extended,
                )
            }
            Strategy::MovingAverage => {
                let config = &self.config.moving_average;
                let fitted = centered_moving_average(y, config)?;
                let last = fitted[n - 1];
                let extended = fitted
                    .iter()
                    .copied()
                    .chain(iter::repeat(last).take(horizon))
                    .collect();
                (
                    FitParameters::MovingAverage {
                        window: config.window,
                        edge: config.edge,
                    },
                    fitted,
                    extended,
                )
            }
        };

        Ok(TrendFit {
            kind,
            parameters,
            fitted,
            extended,
            observations: n,
        })
    }
}

/// Fit `kind` to `y` with the default engine configuration.
///
/// # Errors
///
/// See [`TrendEngine::fit_and_forecast`].
pub fn fit_and_forecast(y: &[f64], kind: ModelKind, horizon: usize) -> Result<TrendFit> {
    TrendEngine::default().fit_series(y, kind, horizon)
}
