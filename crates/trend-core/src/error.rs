//! Error types for trend fitting and report assembly.
//!
//! This module provides structured error types for the trend engine and the
//! report layer built on top of it, with error chaining via `thiserror`.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for trend engine operations that may fail.
pub type Result<T> = core::result::Result<T, TrendError>;

/// Result type alias for report operations that may fail.
pub type ReportResult<T> = core::result::Result<T, ReportError>;

/// Broad classification of a [`TrendError`].
///
/// Callers use this to decide how a failure is surfaced (for example a
/// client error for configuration problems versus an empty report section for
/// a fit that did not converge).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The request named something the engine does not support.
    Configuration,
    /// The series is too short for the requested model.
    InsufficientData,
    /// The nonlinear solver failed to produce usable parameters.
    NonConvergence,
    /// The observations themselves are malformed.
    InvalidInput,
}

/// Errors that can occur while fitting or forecasting a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendError {
    /// The requested model kind is not one of the supported curve families.
    #[error("Unknown model kind: '{0}'")]
    UnknownModel(String),

    /// The requested calendar frequency is not supported.
    #[error("Unknown frequency: '{0}' (expected Daily, Monthly or Yearly)")]
    UnknownFrequency(String),

    /// Invalid engine or solver parameter.
    #[error("Invalid parameter '{name}': {value} (expected {expected})")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Provided value as string.
        value: String,
        /// Description of expected value.
        expected: &'static str,
    },

    /// Not enough observations to fit the requested model.
    #[error("Insufficient data for {model}: need {required} points, got {actual}")]
    InsufficientData {
        /// Model kind that was requested.
        model: &'static str,
        /// Required number of observations.
        required: usize,
        /// Actual number of observations provided.
        actual: usize,
    },

    /// The nonlinear solver did not reach a usable optimum.
    #[error("Fit did not converge for {model}: {reason}")]
    NonConvergence {
        /// Model kind that was requested.
        model: &'static str,
        /// Why the solver gave up.
        reason: String,
    },

    /// Index and observation arrays differ in length.
    #[error("Series length mismatch: x has {x_len} points, y has {y_len}")]
    LengthMismatch {
        /// Length of the index array.
        x_len: usize,
        /// Length of the observation array.
        y_len: usize,
    },

    /// An observation is NaN or infinite.
    #[error("Invalid observation at index {index}: {value}")]
    NonFiniteObservation {
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: f64,
    },
}

impl TrendError {
    /// Create a non-convergence error for the given model.
    #[must_use]
    pub fn non_convergence(model: &'static str, reason: impl Into<String>) -> Self {
        Self::NonConvergence {
            model,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownModel(_) | Self::UnknownFrequency(_) | Self::InvalidParameter { .. } => {
                ErrorCategory::Configuration
            }
            Self::InsufficientData { .. } => ErrorCategory::InsufficientData,
            Self::NonConvergence { .. } => ErrorCategory::NonConvergence,
            Self::LengthMismatch { .. } | Self::NonFiniteObservation { .. } => {
                ErrorCategory::InvalidInput
            }
        }
    }

    /// Returns `true` for configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

/// Errors that can occur while assembling a sales trend report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// The requested range ends before it starts.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// No sale records matched the request.
    #[error("No sales data found between {start} and {end}")]
    NoSales {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// A sale amount could not be used as an observation.
    #[error("Invalid sale amount for record {sale_id}: {amount}")]
    InvalidAmount {
        /// Identifier of the offending record.
        sale_id: i64,
        /// The offending amount.
        amount: f64,
    },

    /// A forecast label fell outside the supported calendar range.
    #[error("Forecast date {step} periods after {end} is out of range")]
    DateOverflow {
        /// Last observed day.
        end: NaiveDate,
        /// 1-based forecast step that overflowed.
        step: usize,
    },

    /// Underlying trend computation failed.
    #[error("Trend computation failed")]
    Trend(#[from] TrendError),
}

impl ReportError {
    /// Returns `true` when the request or its data is at fault rather than
    /// the computation.
    ///
    /// Only solver non-convergence counts as a computation failure.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Trend(err) => err.category() != ErrorCategory::NonConvergence,
            _ => true,
        }
    }
}
