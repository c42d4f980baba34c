//! Common test utilities for sales-trend.
//!
//! This module provides float comparison, synthetic sales generators and
//! helpers for running the command-line binary.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use chrono::{Days, NaiveDate};
use trend_report::prelude::*;

/// Tiered float comparison.
///
/// - For values near zero (|expected| < 1e-10): absolute tolerance
/// - Otherwise: relative tolerance
pub fn assert_float_eq(actual: f64, expected: f64, epsilon: f64, context: &str) {
    if expected.is_nan() {
        assert!(
            actual.is_nan(),
            "{}: Expected NaN but got {}",
            context,
            actual
        );
        return;
    }

    if actual.is_nan() {
        panic!("{}: Got NaN but expected {}", context, expected);
    }

    // For values very close to zero, use absolute comparison
    if expected.abs() < 1e-10 {
        let diff = (actual - expected).abs();
        assert!(
            diff < epsilon,
            "{}: Expected {} but got {} (diff: {})",
            context,
            expected,
            actual,
            diff
        );
        return;
    }

    let rel_diff = ((actual - expected) / expected).abs();
    assert!(
        rel_diff < epsilon,
        "{}: Expected {} but got {} (rel diff: {:.2e})",
        context,
        expected,
        actual,
        rel_diff
    );
}

/// Assert two series are equal with tolerance.
pub fn assert_series_eq(actual: &[f64], expected: &[f64], epsilon: f64, name: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: Length mismatch: {} vs {}",
        name,
        actual.len(),
        expected.len()
    );

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let context = format!("{}[{}]", name, i);
        assert_float_eq(a, e, epsilon, &context);
    }
}

/// Shorthand for a calendar date.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Synthetic Data Generators
// ============================================================================

/// Generate a linear series.
pub fn generate_linear(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Generate `a·e^(b·i) + c`.
pub fn generate_exponential(a: f64, b: f64, c: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| a * (b * i as f64).exp() + c).collect()
}

/// Generate a noisy upward series with a deterministic seed.
pub fn generate_noisy_growth(start: f64, step: f64, noise: f64, len: usize, seed: u64) -> Vec<f64> {
    // Simple LCG for deterministic random numbers
    let mut rng_state = seed;
    let mut lcg_next = || -> f64 {
        rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (rng_state as f64 / u64::MAX as f64) * 2.0 - 1.0
    };

    (0..len)
        .map(|i| (start + step * i as f64 + noise * lcg_next()).max(0.0))
        .collect()
}

/// One sale per day starting at `first`, ids counting from 1.
pub fn daily_sales(first: NaiveDate, amounts: &[f64]) -> Vec<SaleRecord> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, &amount)| {
            let day = first.checked_add_days(Days::new(i as u64)).unwrap();
            SaleRecord::new(i as i64 + 1, day, amount)
        })
        .collect()
}

// ============================================================================
// Binary Helpers
// ============================================================================

/// Write `contents` to a fresh file in the temp directory.
pub fn write_temp_json(name: &str, contents: &serde_json::Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "sales-trend-{}-{}.json",
        std::process::id(),
        name
    ));
    fs::write(&path, serde_json::to_vec_pretty(contents).unwrap()).unwrap();
    path
}

/// Run the `sales-trend` binary.
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sales-trend"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run sales-trend")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_float_eq_normal() {
        assert_float_eq(1.0, 1.0, 1e-10, "test");
        assert_float_eq(100.0, 100.0000001, 1e-6, "test");
    }

    #[test]
    fn test_assert_float_eq_near_zero() {
        assert_float_eq(1e-12, 0.0, 1e-10, "test");
    }

    #[test]
    #[should_panic]
    fn test_assert_float_eq_fails() {
        assert_float_eq(1.0, 2.0, 1e-10, "test");
    }

    #[test]
    fn test_generators() {
        assert_eq!(generate_linear(1.0, 2.0, 3), vec![1.0, 3.0, 5.0]);
        assert_eq!(generate_exponential(1.0, 0.0, 1.0, 2), vec![2.0, 2.0]);
        let noisy = generate_noisy_growth(100.0, 5.0, 3.0, 50, 7);
        assert_eq!(noisy, generate_noisy_growth(100.0, 5.0, 3.0, 50, 7));
        assert!(noisy.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_daily_sales() {
        let sales = daily_sales(date(2024, 2, 28), &[1.0, 2.0, 3.0]);
        assert_eq!(sales[2].sale_date, date(2024, 3, 1));
        assert_eq!(sales[2].sale_id, 3);
    }
}
