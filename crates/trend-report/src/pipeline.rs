//! Report pipeline.
//!
//! Runs the fixed report stages in order:
//!
//! 1. validate the request,
//! 2. select the sales it covers,
//! 3. group them into observations,
//! 4. fit and extrapolate the requested trend,
//! 5. align the fit onto dated rows.

use tracing::{debug, info, warn};
use trend_core::error::{ReportError, ReportResult};
use trend_models::engine::{EngineConfig, TrendEngine};

use crate::{
    aggregate::{per_period, per_sale, Observations},
    alignment::{align, TrendReport},
    record::SaleRecord,
    request::ReportRequest,
};

/// Builds trend reports from sale records.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use trend_report::prelude::*;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let sales: Vec<SaleRecord> = (1..=5)
///     .map(|d| SaleRecord::new(d as i64, day(d), f64::from(d)))
///     .collect();
///
/// let request = ReportRequest::new(day(1), day(5)).with_horizon(3);
/// let report = ReportPipeline::default().run(&request, &sales)?;
///
/// assert_eq!(report.rows.len(), 8);
/// # Ok::<(), ReportError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportPipeline {
    engine: TrendEngine,
}

impl ReportPipeline {
    /// Create a pipeline around an existing engine.
    pub fn new(engine: TrendEngine) -> Self {
        Self { engine }
    }

    /// Create a pipeline with a fresh engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine configuration is invalid.
    pub fn with_config(config: EngineConfig) -> ReportResult<Self> {
        Ok(Self::new(TrendEngine::new(config)?))
    }

    /// The trend engine.
    pub fn engine(&self) -> &TrendEngine {
        &self.engine
    }

    /// Sales covered by `request`, ordered by date then sale id.
    ///
    /// # Errors
    ///
    /// - [`ReportError::InvalidDateRange`] for a reversed range.
    /// - [`ReportError::NoSales`] if nothing matches.
    pub fn select_sales<'a>(
        &self,
        request: &ReportRequest,
        records: &'a [SaleRecord],
    ) -> ReportResult<Vec<&'a SaleRecord>> {
        request.validate()?;

        let mut selected: Vec<&SaleRecord> =
            records.iter().filter(|r| request.selects(r)).collect();
        selected.sort_by_key(|r| (r.sale_date, r.sale_id));

        debug!(
            available = records.len(),
            selected = selected.len(),
            start = %request.start_date,
            end = %request.end_date,
            "selected sales"
        );

        if selected.is_empty() {
            return Err(ReportError::NoSales {
                start: request.start_date,
                end: request.end_date,
            });
        }
        Ok(selected)
    }

    /// Observation series for `request`.
    ///
    /// # Errors
    ///
    /// See [`select_sales`](Self::select_sales); also fails on a non-finite
    /// sale amount.
    pub fn observations(
        &self,
        request: &ReportRequest,
        records: &[SaleRecord],
    ) -> ReportResult<Observations> {
        let selected = self.select_sales(request, records)?;
        if request.aggregate {
            per_period(selected, request.frequency)
        } else {
            per_sale(selected)
        }
    }

    /// Build the full report for `request`.
    ///
    /// # Errors
    ///
    /// Request and selection errors as in [`select_sales`](Self::select_sales),
    /// and any [`TrendError`](trend_core::TrendError) from fitting, wrapped in
    /// [`ReportError::Trend`].
    pub fn run(&self, request: &ReportRequest, records: &[SaleRecord]) -> ReportResult<TrendReport> {
        let observations = self.observations(request, records)?;
        let horizon = request.horizon();

        let fit = self
            .engine
            .fit_series(observations.values(), request.trend_type, horizon)
            .map_err(|err| {
                warn!(
                    trend_type = %request.trend_type,
                    observations = observations.len(),
                    error = %err,
                    "trend fit failed"
                );
                ReportError::from(err)
            })?;

        let report = align(&observations, &fit, request.frequency, request.end_date)?;
        info!(
            trend_type = %request.trend_type,
            frequency = %request.frequency,
            observations = report.observations,
            horizon = report.horizon,
            "built trend report"
        );
        Ok(report)
    }
}
