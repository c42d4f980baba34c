//! Prelude for trend-models.
//!
//! This module re-exports all commonly used types and functions.

// Engine
pub use crate::engine::{fit_and_forecast, EngineConfig, FitParameters, TrendEngine, TrendFit};
pub use crate::kind::ModelKind;

// Regression
pub use crate::regression::{polyfit, Polynomial};

// Curve families
pub use crate::curve::{
    levenberg_marquardt, CurveSolution, Exponential, Logarithmic, PowerLaw, SolverConfig,
    Termination,
};

// Smoothing
pub use crate::smoothing::{centered_moving_average, EdgePolicy, MovingAverageConfig};

// Errors
pub use trend_core::error::{ErrorCategory, TrendError};
