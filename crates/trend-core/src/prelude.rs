//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits from trend-core.
//!
//! # Example
//!
//! ```rust
//! use trend_core::prelude::*;
//!
//! let series = Series::from_vec(vec![1.0, 2.0, 3.0]);
//! let frequency = Frequency::Monthly;
//! assert_eq!(frequency.step_days(), 30);
//! assert_eq!(series.len(), 3);
//! ```

// Core types
pub use crate::calendar::Frequency;
pub use crate::series::{ensure_finite, index_axis, Series};

// Error types
pub use crate::error::{ErrorCategory, ReportError, ReportResult, Result, TrendError};

// Traits
pub use crate::traits::CurveModel;

// Utility functions
pub use crate::utils::{l2_norm, max_abs, polyval, solve_linear_system};
