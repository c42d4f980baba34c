//! Report requests and sale filters.
//!
//! Field names serialize in camelCase (`startDate`, `trendType`,
//! `predictionYears`, `minAge`, ...) so a request can be read straight from
//! query-style JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trend_core::{
    calendar::Frequency,
    error::{ReportError, ReportResult},
};
use trend_models::kind::ModelKind;

use crate::record::SaleRecord;

/// Filter value meaning "do not filter on this field".
pub const MATCH_ALL: &str = "All";

const MONTHS_PER_YEAR: usize = 12;

/// Optional restrictions on which sales enter a report.
///
/// Text filters set to [`MATCH_ALL`] are treated as absent. A record missing
/// a filtered field never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesFilter {
    /// Exact client gender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Minimum client age, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    /// Maximum client age, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    /// Exact city name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl SalesFilter {
    /// Create a filter that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one gender. `"All"` clears the restriction.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = restriction(gender.into());
        self
    }

    /// Restrict to one city. `"All"` clears the restriction.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = restriction(city.into());
        self
    }

    /// Restrict to an inclusive age range; either bound may be open.
    pub fn with_age_range(mut self, min_age: Option<u32>, max_age: Option<u32>) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    /// Returns `true` if no field is restricted.
    pub fn is_unrestricted(&self) -> bool {
        text_matches_all(&self.gender)
            && text_matches_all(&self.city)
            && self.min_age.is_none()
            && self.max_age.is_none()
    }

    /// Returns `true` if `record` passes every restriction.
    pub fn matches(&self, record: &SaleRecord) -> bool {
        text_matches(&self.gender, record.gender.as_deref())
            && text_matches(&self.city, record.city.as_deref())
            && bound_matches(self.min_age, record.age, |age, min| age >= min)
            && bound_matches(self.max_age, record.age, |age, max| age <= max)
    }
}

fn restriction(value: String) -> Option<String> {
    (value != MATCH_ALL).then_some(value)
}

fn text_matches_all(filter: &Option<String>) -> bool {
    filter.as_deref().map_or(true, |f| f == MATCH_ALL)
}

fn text_matches(filter: &Option<String>, value: Option<&str>) -> bool {
    match filter.as_deref() {
        None | Some(MATCH_ALL) => true,
        Some(wanted) => value == Some(wanted),
    }
}

fn bound_matches(bound: Option<u32>, value: Option<u32>, test: impl Fn(u32, u32) -> bool) -> bool {
    match (bound, value) {
        (None, _) => true,
        (Some(bound), Some(value)) => test(value, bound),
        (Some(_), None) => false,
    }
}

fn default_trend_type() -> ModelKind {
    ModelKind::Linear
}

fn default_prediction_years() -> u32 {
    1
}

/// A request for a sales trend report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// First day of the sales range, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the sales range, inclusive. Forecast labels count from here.
    pub end_date: NaiveDate,
    /// Trend model to fit.
    #[serde(default = "default_trend_type")]
    pub trend_type: ModelKind,
    /// Spacing used for forecast labels and period aggregation.
    #[serde(default)]
    pub frequency: Frequency,
    /// Years to forecast; each year is 12 forecast periods.
    #[serde(default = "default_prediction_years")]
    pub prediction_years: u32,
    /// Explicit forecast length, overriding `prediction_years`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon: Option<usize>,
    /// Sum sales per calendar period instead of one observation per sale.
    #[serde(default)]
    pub aggregate: bool,
    /// Restrictions on which sales are included.
    #[serde(flatten)]
    pub filter: SalesFilter,
}

impl ReportRequest {
    /// Create a request for `start_date..=end_date` with default settings.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            trend_type: default_trend_type(),
            frequency: Frequency::default(),
            prediction_years: default_prediction_years(),
            horizon: None,
            aggregate: false,
            filter: SalesFilter::default(),
        }
    }

    /// Set the trend model.
    pub fn with_trend_type(mut self, trend_type: ModelKind) -> Self {
        self.trend_type = trend_type;
        self
    }

    /// Set the frequency.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the number of years to forecast.
    pub fn with_prediction_years(mut self, years: u32) -> Self {
        self.prediction_years = years;
        self
    }

    /// Set an explicit forecast length.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Enable or disable period aggregation.
    pub fn with_aggregate(mut self, aggregate: bool) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Set the sales filter.
    pub fn with_filter(mut self, filter: SalesFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Number of forecast periods.
    ///
    /// The explicit horizon wins; otherwise twelve periods per prediction year.
    pub fn horizon(&self) -> usize {
        self.horizon
            .unwrap_or(self.prediction_years as usize * MONTHS_PER_YEAR)
    }

    /// Check the date range.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidDateRange`] if the range ends before it starts.
    pub fn validate(&self) -> ReportResult<()> {
        if self.start_date > self.end_date {
            return Err(ReportError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Returns `true` if `date` lies in the requested range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start_date..=self.end_date).contains(&date)
    }

    /// Returns `true` if `record` is in range and passes the filter.
    pub fn selects(&self, record: &SaleRecord) -> bool {
        self.contains(record.sale_date) && self.filter.matches(record)
    }
}
