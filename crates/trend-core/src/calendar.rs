//! Calendar frequency of an observation series.
//!
//! Two distinct notions of "one period" live here:
//!
//! - **Bucketing** ([`Frequency::period_start`], [`Frequency::next_period`])
//!   follows the real calendar: a month is a calendar month, a year a calendar
//!   year. It is used when sale records are aggregated into a series.
//! - **Forecast labeling** ([`Frequency::forecast_date`]) steps a fixed number
//!   of days from the series end date: 1 for daily, 30 for monthly and 365 for
//!   yearly series. Report consumers depend on these labels, so the offsets are
//!   not calendar-accurate and must stay that way.

use core::fmt;
use core::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::TrendError;

/// Spacing between successive observations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Frequency {
    /// One observation per day.
    #[default]
    Daily,
    /// One observation per month.
    Monthly,
    /// One observation per year.
    Yearly,
}

impl Frequency {
    /// All supported frequencies.
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Monthly, Frequency::Yearly];

    /// Number of days one forecast step advances the label.
    #[must_use]
    pub const fn step_days(self) -> u64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Monthly => 30,
            Frequency::Yearly => 365,
        }
    }

    /// Label for the `step`-th forecast period after `end_date` (1-based).
    ///
    /// Returns `None` only if the date overflows the supported range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use trend_core::Frequency;
    ///
    /// let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    /// let label = Frequency::Monthly.forecast_date(end, 1).unwrap();
    /// assert_eq!(label, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    /// ```
    #[must_use]
    pub fn forecast_date(self, end_date: NaiveDate, step: usize) -> Option<NaiveDate> {
        let days = self.step_days().checked_mul(step as u64)?;
        end_date.checked_add_days(Days::new(days))
    }

    /// Labels for forecast periods `1..=horizon` after `end_date`.
    #[must_use]
    pub fn forecast_dates(self, end_date: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
        (1..=horizon)
            .map_while(|step| self.forecast_date(end_date, step))
            .collect()
    }

    /// First day of the calendar period containing `date`.
    #[must_use]
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        let start = match self {
            Frequency::Daily => Some(date),
            Frequency::Monthly => date.with_day(1),
            Frequency::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        };
        start.unwrap_or(date)
    }

    /// First day of the calendar period following the one starting at `start`.
    #[must_use]
    pub fn next_period(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => start.checked_add_days(Days::new(1)),
            Frequency::Monthly => start.checked_add_months(Months::new(1)),
            Frequency::Yearly => start.checked_add_months(Months::new(12)),
        }
    }

    /// Canonical name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(TrendError::UnknownFrequency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_forecast_offsets_are_fixed_day_counts() {
        let end = date(2023, 12, 31);
        assert_eq!(Frequency::Daily.forecast_date(end, 1), Some(date(2024, 1, 1)));
        assert_eq!(Frequency::Monthly.forecast_date(end, 1), Some(date(2024, 1, 30)));
        assert_eq!(Frequency::Monthly.forecast_date(end, 2), Some(date(2024, 2, 29)));
        // 2024 is a leap year, so 365 days lands one day short of the anniversary
        assert_eq!(Frequency::Yearly.forecast_date(end, 1), Some(date(2024, 12, 30)));
    }

    #[test]
    fn test_forecast_dates() {
        let end = date(2024, 6, 1);
        let labels = Frequency::Daily.forecast_dates(end, 3);
        assert_eq!(labels, vec![date(2024, 6, 2), date(2024, 6, 3), date(2024, 6, 4)]);
        assert!(Frequency::Yearly.forecast_dates(end, 0).is_empty());
    }

    #[test]
    fn test_period_start() {
        let d = date(2024, 5, 17);
        assert_eq!(Frequency::Daily.period_start(d), d);
        assert_eq!(Frequency::Monthly.period_start(d), date(2024, 5, 1));
        assert_eq!(Frequency::Yearly.period_start(d), date(2024, 1, 1));
    }

    #[test]
    fn test_next_period_is_calendar_accurate() {
        assert_eq!(Frequency::Daily.next_period(date(2024, 2, 28)), Some(date(2024, 2, 29)));
        assert_eq!(Frequency::Monthly.next_period(date(2024, 1, 1)), Some(date(2024, 2, 1)));
        assert_eq!(Frequency::Yearly.next_period(date(2024, 1, 1)), Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Daily".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!("monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!(" YEARLY ".parse::<Frequency>().unwrap(), Frequency::Yearly);

        let err = "Weekly".parse::<Frequency>().unwrap_err();
        assert_eq!(err, TrendError::UnknownFrequency("Weekly".to_string()));
    }

    #[test]
    fn test_display_roundtrip() {
        for freq in Frequency::ALL {
            assert_eq!(freq.to_string().parse::<Frequency>().unwrap(), freq);
        }
    }
}
