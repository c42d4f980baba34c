//! # trend-core
//!
//! Core types and traits for the sales-trend workspace.
//!
//! This crate provides the foundational abstractions used by the trend engine
//! and the report layer:
//!
//! - [`Series`] - Ordered, equally spaced observation series
//! - [`Frequency`] - Daily/monthly/yearly spacing and forecast date labels
//! - [`CurveModel`] - Strategy trait for nonlinear curve families
//! - [`TrendError`] and [`ReportError`] - Error taxonomy
//!
//! ## Feature Flags
//!
//! - `serde` (default) - Enable serialization/deserialization support
//!
//! ## Example
//!
//! ```rust
//! use trend_core::prelude::*;
//!
//! let sales = Series::from_vec(vec![120.0, 131.0, 127.5, 140.0]);
//! sales.validate()?;
//! assert_eq!(sales.extended_axis(2).len(), 6);
//! # Ok::<(), TrendError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod calendar;
pub mod error;
pub mod prelude;
pub mod series;
pub mod traits;
pub mod utils;

// Re-export core types at crate root
pub use calendar::Frequency;
pub use error::{ErrorCategory, ReportError, ReportResult, Result, TrendError};
pub use series::Series;
pub use traits::CurveModel;
