//! Sale records as delivered by the sales store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trend_core::error::{ReportError, ReportResult};

/// One sale, joined with its client, book and city details.
///
/// Only `sale_id`, `sale_date` and `total_sales` are required; descriptive
/// fields may be missing when the joined row is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Unique sale identifier.
    pub sale_id: i64,
    /// Day of the sale.
    pub sale_date: NaiveDate,
    /// Sale amount.
    pub total_sales: f64,
    /// Number of items sold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Title of the book sold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    /// Book category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Client gender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Client age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Client age bracket label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    /// City of the sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl SaleRecord {
    /// Create a record with no descriptive fields.
    pub fn new(sale_id: i64, sale_date: NaiveDate, total_sales: f64) -> Self {
        Self {
            sale_id,
            sale_date,
            total_sales,
            quantity: None,
            book_title: None,
            category: None,
            gender: None,
            age: None,
            age_group: None,
            city: None,
        }
    }

    /// Set the client gender.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Set the client age.
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Set the city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sale amount, checked to be usable as an observation.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidAmount`] for NaN or infinite amounts.
    pub fn amount(&self) -> ReportResult<f64> {
        if self.total_sales.is_finite() {
            Ok(self.total_sales)
        } else {
            Err(ReportError::InvalidAmount {
                sale_id: self.sale_id,
                amount: self.total_sales,
            })
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
    fn test_builder() {
        let record = SaleRecord::new(7, date(2024, 5, 1), 19.99)
            .with_gender("F")
            .with_age(34)
            .with_city("Lyon")
            .with_quantity(2);
        assert_eq!(record.gender.as_deref(), Some("F"));
        assert_eq!(record.age, Some(34));
        assert_eq!(record.city.as_deref(), Some("Lyon"));
        assert_eq!(record.quantity, Some(2));
        assert_eq!(record.amount().unwrap(), 19.99);
    }

    #[test]
    fn test_non_finite_amount() {
        let record = SaleRecord::new(3, date(2024, 5, 1), f64::INFINITY);
        assert!(matches!(
            record.amount(),
            Err(ReportError::InvalidAmount { sale_id: 3, .. })
        ));
    }

    #[test]
    fn test_deserialize_minimal_row() {
        let json = r#"{"sale_id": 1, "sale_date": "2024-01-15", "total_sales": 42.5}"#;
        let record: SaleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, SaleRecord::new(1, date(2024, 1, 15), 42.5));
    }

    #[test]
    fn test_deserialize_full_row() {
        let json = r#"{
            "sale_id": 2,
            "sale_date": "2024-02-01",
            "total_sales": 10.0,
            "quantity": 1,
            "book_title": "Dune",
            "category": "Fiction",
            "gender": "M",
            "age": 41,
            "age_group": "35-44",
            "city": "Porto"
        }"#;
        let record: SaleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.book_title.as_deref(), Some("Dune"));
        assert_eq!(record.age_group.as_deref(), Some("35-44"));
        assert_eq!(record.age, Some(41));
    }
}
