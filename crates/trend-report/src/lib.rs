//! # trend-report
//!
//! Sales trend reports for the sales-trend workspace.
//!
//! This crate connects sale records to the trend engine:
//!
//! - [`SaleRecord`] - One sale with its client and city details
//! - [`ReportRequest`] - Date range, filters, model kind, frequency, horizon
//! - [`aggregate`] - Per-sale or per-period observation series
//! - [`TrendReport`] - Dated rows of actuals, trend line and forecast
//! - [`ReportPipeline`] - Runs the stages end to end
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use trend_report::prelude::*;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//! let sales = vec![
//!     SaleRecord::new(1, day(1), 40.0),
//!     SaleRecord::new(2, day(2), 42.0),
//!     SaleRecord::new(3, day(4), 47.0),
//! ];
//!
//! let request = ReportRequest::new(day(1), day(4))
//!     .with_aggregate(true)
//!     .with_horizon(2);
//! let report = ReportPipeline::default().run(&request, &sales)?;
//!
//! // Four days including the zero-filled 3rd, then two forecast rows
//! assert_eq!(report.observed_rows().len(), 4);
//! assert_eq!(report.forecast_rows().len(), 2);
//! println!("{report}");
//! # Ok::<(), ReportError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod alignment;
pub mod pipeline;
pub mod record;
pub mod request;

pub mod prelude;

pub use prelude::*;
