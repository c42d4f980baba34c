//! Aligning a trend fit onto dated report rows.
//!
//! A report has one row per observation followed by one row per forecast
//! period:
//!
//! | Date        | Total Sales | Trend Line  | Estimated Future Trend |
//! |-------------|-------------|-------------|------------------------|
//! | observed    | actual      | `fitted[i]` |                        |
//! | end + step  |             |             | `extended[n + i]`      |
//!
//! Forecast rows are labeled from the request end date with the fixed day
//! offsets of [`Frequency::forecast_date`].

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trend_core::{
    calendar::Frequency,
    error::{ReportError, ReportResult, TrendError},
};
use trend_models::{
    engine::{FitParameters, TrendFit},
    kind::ModelKind,
};

use crate::aggregate::Observations;

/// Column headers, in row order.
pub const HEADERS: [&str; 4] = ["Date", "Total Sales", "Trend Line", "Estimated Future Trend"];

/// One report row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Observation date or forecast label.
    pub date: NaiveDate,
    /// Observed value; empty on forecast rows.
    pub total_sales: Option<f64>,
    /// Fitted trend; empty on forecast rows.
    pub trend_line: Option<f64>,
    /// Forecast value; empty on observation rows.
    pub future_trend: Option<f64>,
}

impl ReportRow {
    /// Returns `true` for a forecast row.
    pub fn is_forecast(&self) -> bool {
        self.future_trend.is_some()
    }
}

/// A complete trend report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    /// Model that produced the trend.
    pub trend_type: ModelKind,
    /// Frequency used for forecast labels.
    pub frequency: Frequency,
    /// Number of observation rows.
    pub observations: usize,
    /// Number of forecast rows.
    pub horizon: usize,
    /// Fitted model parameters.
    pub parameters: FitParameters,
    /// Observation rows followed by forecast rows.
    pub rows: Vec<ReportRow>,
}

impl TrendReport {
    /// Column headers.
    pub fn headers(&self) -> [&'static str; 4] {
        HEADERS
    }

    /// Observation rows.
    pub fn observed_rows(&self) -> &[ReportRow] {
        self.split().0
    }

    /// Forecast rows.
    pub fn forecast_rows(&self) -> &[ReportRow] {
        self.split().1
    }

    // Fields are public, so `observations` may exceed the rows
    fn split(&self) -> (&[ReportRow], &[ReportRow]) {
        self.rows.split_at(self.observations.min(self.rows.len()))
    }
}

/// Build report rows from observations and their fit.
///
/// # Errors
///
/// - [`TrendError::LengthMismatch`] if the fit was made on a different number
///   of observations.
/// - [`ReportError::DateOverflow`] if a forecast label is out of range.
pub fn align(
    observations: &Observations,
    fit: &TrendFit,
    frequency: Frequency,
    end_date: NaiveDate,
) -> ReportResult<TrendReport> {
    if fit.observations() != observations.len() {
        return Err(TrendError::LengthMismatch {
            x_len: observations.len(),
            y_len: fit.observations(),
        }
        .into());
    }

    let mut rows = Vec::with_capacity(fit.extended().len());
    rows.extend(
        observations
            .iter()
            .zip(fit.fitted())
            .map(|((date, actual), &trend)| ReportRow {
                date,
                total_sales: Some(actual),
                trend_line: Some(trend),
                future_trend: None,
            }),
    );

    for (i, &value) in fit.forecast().iter().enumerate() {
        let step = i + 1;
        let date = frequency
            .forecast_date(end_date, step)
            .ok_or(ReportError::DateOverflow { end: end_date, step })?;
        rows.push(ReportRow {
            date,
            total_sales: None,
            trend_line: None,
            future_trend: Some(value),
        });
    }

    Ok(TrendReport {
        trend_type: fit.kind(),
        frequency,
        observations: fit.observations(),
        horizon: fit.horizon(),
        parameters: fit.parameters().clone(),
        rows,
    })
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

impl fmt::Display for TrendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.date.format("%Y-%m-%d").to_string(),
                    cell(row.total_sales),
                    cell(row.trend_line),
                    cell(row.future_trend),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &cells {
            for (width, text) in widths.iter_mut().zip(row) {
                *width = (*width).max(text.len());
            }
        }

        write!(f, "|")?;
        for (header, width) in HEADERS.iter().zip(widths) {
            write!(f, " {header:<width$} |")?;
        }
        writeln!(f)?;

        write!(f, "|")?;
        for width in widths {
            write!(f, "{}|", "-".repeat(width + 2))?;
        }
        writeln!(f)?;

        for row in &cells {
            write!(f, "| {:<width$} |", row[0], width = widths[0])?;
            for (text, width) in row.iter().zip(widths).skip(1) {
                write!(f, " {text:>width$} |")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trend_models::engine::fit_and_forecast;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn observations() -> Observations {
        let dates = (1..=5).map(|d| date(2024, 1, d)).collect();
        Observations::new(dates, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap()
    }

    #[test]
    fn test_rows_and_labels() {
        let obs = observations();
        let fit = fit_and_forecast(obs.values(), ModelKind::Linear, 3).unwrap();
        let report = align(&obs, &fit, Frequency::Monthly, date(2024, 1, 31)).unwrap();

        assert_eq!(report.rows.len(), 8);
        assert_eq!(report.observed_rows().len(), 5);
        assert_eq!(report.forecast_rows().len(), 3);

        let first = report.rows[0];
        assert_eq!(first.date, date(2024, 1, 1));
        assert_eq!(first.total_sales, Some(1.0));
        assert_relative_eq!(first.trend_line.unwrap(), 1.0, epsilon = 1e-9);
        assert_eq!(first.future_trend, None);

        let labels: Vec<NaiveDate> = report.forecast_rows().iter().map(|r| r.date).collect();
        assert_eq!(labels, vec![date(2024, 3, 1), date(2024, 3, 31), date(2024, 4, 30)]);

        let future = report.forecast_rows()[0];
        assert!(future.is_forecast());
        assert_eq!(future.total_sales, None);
        assert_eq!(future.trend_line, None);
        assert_relative_eq!(future.future_trend.unwrap(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_horizon_has_no_forecast_rows() {
        let obs = observations();
        let fit = fit_and_forecast(obs.values(), ModelKind::MovingAverage, 0).unwrap();
        let report = align(&obs, &fit, Frequency::Daily, date(2024, 1, 5)).unwrap();
        assert!(report.forecast_rows().is_empty());
        assert_eq!(report.rows.len(), 5);
    }

    #[test]
    fn test_mismatched_fit_rejected() {
        let obs = observations();
        let fit = fit_and_forecast(&[1.0, 2.0], ModelKind::Linear, 1).unwrap();
        assert!(align(&obs, &fit, Frequency::Daily, date(2024, 1, 5)).is_err());
    }

    #[test]
    fn test_date_overflow() {
        let obs = Observations::new(vec![NaiveDate::MAX], vec![1.0]).unwrap();
        let fit = fit_and_forecast(obs.values(), ModelKind::Linear, 1).unwrap();
        assert!(matches!(
            align(&obs, &fit, Frequency::Daily, NaiveDate::MAX),
            Err(ReportError::DateOverflow { step: 1, .. })
        ));
    }

    #[test]
    fn test_display_table() {
        let obs = observations();
        let fit = fit_and_forecast(obs.values(), ModelKind::Linear, 1).unwrap();
        let report = align(&obs, &fit, Frequency::Daily, date(2024, 1, 5)).unwrap();
        let table = report.to_string();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2 + 6);
        assert_eq!(
            lines[0],
            "| Date       | Total Sales | Trend Line | Estimated Future Trend |"
        );
        assert!(lines[2].starts_with("| 2024-01-01 |"));
        assert!(lines[7].starts_with("| 2024-01-06 |"));
        assert!(lines[7].trim_end().ends_with("6.00 |"));
    }

    #[test]
    fn test_row_split_clamps_observation_count() {
        let obs = observations();
        let fit = fit_and_forecast(obs.values(), ModelKind::Linear, 2).unwrap();
        let mut report = align(&obs, &fit, Frequency::Daily, date(2024, 1, 5)).unwrap();

        report.observations = 40;
        assert_eq!(report.observed_rows().len(), 7);
        assert!(report.forecast_rows().is_empty());
        assert_eq!(report.to_string().lines().count(), 2 + 7);
    }
}
