//! # trend-models
//!
//! Trend fitting and forecasting for the sales-trend workspace.
//!
//! This crate turns an observation series into a fitted trend line and an
//! extrapolated forecast. Six model kinds are available, grouped by how they
//! are computed:
//!
//! - **Regression**: linear and quadratic least squares
//! - **Curve**: exponential, logarithmic and power-law families fitted by a
//!   shared Levenberg–Marquardt solver
//! - **Smoothing**: centered moving average, forecast held flat
//!
//! [`TrendEngine`] dispatches a [`ModelKind`] through a strategy table and
//! returns a [`TrendFit`] holding the fitted values, the extended series and
//! the forecast.
//!
//! # Example
//!
//! ```
//! use trend_models::prelude::*;
//!
//! let sales = [120.0, 135.0, 149.0, 166.0, 180.0];
//! let fit = fit_and_forecast(&sales, ModelKind::Polynomial, 12)?;
//!
//! assert_eq!(fit.extended().len(), sales.len() + 12);
//! assert_eq!(fit.forecast().len(), 12);
//! # Ok::<(), TrendError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod curve;
pub mod engine;
pub mod kind;
pub mod regression;
pub mod smoothing;

pub mod prelude;

pub use prelude::*;
