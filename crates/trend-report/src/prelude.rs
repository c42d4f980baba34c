//! Prelude for trend-report.
//!
//! This module re-exports all commonly used types and functions.

pub use crate::aggregate::{per_period, per_sale, Observations};
pub use crate::alignment::{align, ReportRow, TrendReport, HEADERS};
pub use crate::pipeline::ReportPipeline;
pub use crate::record::SaleRecord;
pub use crate::request::{ReportRequest, SalesFilter, MATCH_ALL};

// Types used in requests and reports
pub use trend_core::calendar::Frequency;
pub use trend_core::error::{ErrorCategory, ReportError, ReportResult, TrendError};
pub use trend_models::engine::{EngineConfig, FitParameters};
pub use trend_models::kind::ModelKind;
