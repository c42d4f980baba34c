//! Turning selected sale records into an equally spaced observation series.
//!
//! Two groupings are supported:
//!
//! - [`per_sale`]: each record is one observation, ordered by date. This is
//!   how the sales store has always fed the trend engine.
//! - [`per_period`]: records are summed per calendar period of the request's
//!   frequency, and periods without sales are filled with zero so that
//!   successive indices are exactly one period apart.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trend_core::{
    calendar::Frequency,
    error::{ReportResult, TrendError},
    series::Series,
};

use crate::record::SaleRecord;

/// Dated observations ready for fitting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    dates: Vec<NaiveDate>,
    values: Series,
}

impl Observations {
    /// Build from parallel date and value vectors.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::LengthMismatch`] if the lengths differ.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> ReportResult<Self> {
        if dates.len() != values.len() {
            return Err(TrendError::LengthMismatch {
                x_len: dates.len(),
                y_len: values.len(),
            }
            .into());
        }
        Ok(Self {
            dates,
            values: Series::from_vec(values),
        })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observation dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observed values.
    pub fn values(&self) -> &[f64] {
        self.values.as_slice()
    }

    /// Iterate `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// One observation per record, ordered by date then sale id.
///
/// # Errors
///
/// Returns [`ReportError::InvalidAmount`](trend_core::ReportError::InvalidAmount)
/// for a non-finite sale amount.
pub fn per_sale<'a, I>(records: I) -> ReportResult<Observations>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut rows: Vec<&SaleRecord> = records.into_iter().collect();
    rows.sort_by_key(|r| (r.sale_date, r.sale_id));

    let mut dates = Vec::with_capacity(rows.len());
    let mut values = Vec::with_capacity(rows.len());
    for record in rows {
        dates.push(record.sale_date);
        values.push(record.amount()?);
    }

    debug!(observations = values.len(), "grouped sales per record");
    Observations::new(dates, values)
}

/// Sum records per calendar period, filling empty periods with zero.
///
/// Each observation is dated by the first day of its period.
///
/// # Errors
///
/// Returns [`ReportError::InvalidAmount`](trend_core::ReportError::InvalidAmount)
/// for a non-finite sale amount.
pub fn per_period<'a, I>(records: I, frequency: Frequency) -> ReportResult<Observations>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        let amount = record.amount()?;
        *buckets.entry(frequency.period_start(record.sale_date)).or_insert(0.0) += amount;
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Ok(Observations::default());
    };

    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut period = Some(first);
    while let Some(start) = period.filter(|p| *p <= last) {
        dates.push(start);
        values.push(buckets.get(&start).copied().unwrap_or(0.0));
        period = frequency.next_period(start);
    }

    debug!(
        %frequency,
        periods = values.len(),
        filled = values.len() - buckets.len(),
        "grouped sales per period"
    );
    Observations::new(dates, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trend_core::error::ReportError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_per_sale_orders_by_date_then_id() {
        let records = vec![
            SaleRecord::new(3, date(2024, 1, 2), 30.0),
            SaleRecord::new(2, date(2024, 1, 1), 20.0),
            SaleRecord::new(1, date(2024, 1, 2), 10.0),
        ];
        let obs = per_sale(&records).unwrap();
        assert_eq!(obs.values(), &[20.0, 10.0, 30.0]);
        assert_eq!(
            obs.dates(),
            &[date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 2)]
        );
    }

    #[test]
    fn test_per_period_daily_zero_fills() {
        let records = vec![
            SaleRecord::new(1, date(2024, 1, 1), 5.0),
            SaleRecord::new(2, date(2024, 1, 1), 7.0),
            SaleRecord::new(3, date(2024, 1, 4), 2.5),
        ];
        let obs = per_period(&records, Frequency::Daily).unwrap();
        assert_eq!(obs.len(), 4);
        assert_eq!(obs.values(), &[12.0, 0.0, 0.0, 2.5]);
        assert_eq!(obs.dates()[3], date(2024, 1, 4));
    }

    #[test]
    fn test_per_period_monthly_uses_calendar_months() {
        let records = vec![
            SaleRecord::new(1, date(2024, 1, 31), 1.0),
            SaleRecord::new(2, date(2024, 2, 29), 2.0),
            SaleRecord::new(3, date(2024, 4, 1), 4.0),
            SaleRecord::new(4, date(2024, 4, 30), 0.5),
        ];
        let obs = per_period(&records, Frequency::Monthly).unwrap();
        assert_eq!(
            obs.dates(),
            &[date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]
        );
        assert_relative_eq!(obs.values()[3], 4.5);
        assert_eq!(obs.values()[2], 0.0);
    }

    #[test]
    fn test_per_period_yearly() {
        let records = vec![
            SaleRecord::new(1, date(2021, 6, 1), 100.0),
            SaleRecord::new(2, date(2023, 12, 31), 50.0),
        ];
        let obs = per_period(&records, Frequency::Yearly).unwrap();
        assert_eq!(obs.values(), &[100.0, 0.0, 50.0]);
        assert_eq!(obs.dates()[1], date(2022, 1, 1));
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<SaleRecord> = Vec::new();
        assert!(per_sale(&records).unwrap().is_empty());
        assert!(per_period(&records, Frequency::Monthly).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_amount_rejected() {
        let records = vec![SaleRecord::new(9, date(2024, 1, 1), f64::NAN)];
        assert!(matches!(
            per_period(&records, Frequency::Daily),
            Err(ReportError::InvalidAmount { sale_id: 9, .. })
        ));
    }

    #[test]
    fn test_observations_length_check() {
        assert!(Observations::new(vec![date(2024, 1, 1)], vec![]).is_err());
    }
}
