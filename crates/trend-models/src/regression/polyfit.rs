//! Least-squares polynomial fitting.
//!
//! The Vandermonde system is solved with Householder QR after scaling each
//! column to unit norm, which keeps quadratic fits over long daily series
//! (indices in the thousands) well conditioned. Under-determined systems get
//! the minimum-norm solution in the same scaled coordinates.

use trend_core::{
    error::{Result, TrendError},
    series::ensure_finite,
    utils::{polyval, solve_linear_system},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fitted polynomial.
///
/// Coefficients run from the highest degree down to the constant term.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Create a polynomial from coefficients ordered highest degree first.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Coefficients, highest degree first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        polyval(&self.coefficients, x)
    }

    /// Evaluate over a whole axis.
    pub fn evaluate_all(&self, axis: &[f64]) -> Vec<f64> {
        axis.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Coefficients padded with leading zeros to `degree + 1` entries.
    pub fn padded_coefficients(&self, degree: usize) -> Vec<f64> {
        let width = degree + 1;
        let mut out = vec![0.0; width.saturating_sub(self.coefficients.len())];
        out.extend_from_slice(&self.coefficients);
        out
    }
}

/// Fit a polynomial of the given degree to `(x, y)` by least squares.
///
/// When there are fewer distinct `x` values than coefficients the fit is
/// under-determined. The result then passes through the mean `y` at each
/// distinct `x` and has the smallest scaled coefficient norm among all such
/// polynomials, so `[3, 5]` at `x = [0, 1]` with degree 2 gives `x² + x + 3`.
///
/// # Errors
///
/// - [`TrendError::LengthMismatch`] if `x` and `y` differ in length.
/// - [`TrendError::InsufficientData`] if the input is empty.
/// - [`TrendError::NonFiniteObservation`] if any input is NaN or infinite.
/// - [`TrendError::NonConvergence`] if the scaled system is numerically rank
///   deficient.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Result<Polynomial> {
    if x.len() != y.len() {
        return Err(TrendError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if y.is_empty() {
        return Err(TrendError::InsufficientData {
            model: "polynomial",
            required: 1,
            actual: 0,
        });
    }

    ensure_finite(x)?;
    ensure_finite(y)?;

    let width = degree + 1;

    // Vandermonde columns: x^degree, ..., x, 1
    let mut columns: Vec<Vec<f64>> = (0..width)
        .map(|c| {
            let power = (degree - c) as i32;
            x.iter().map(|&xi| xi.powi(power)).collect()
        })
        .collect();

    let scales: Vec<f64> = columns
        .iter()
        .map(|col| {
            let norm = col.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm == 0.0 {
                1.0
            } else {
                norm
            }
        })
        .collect();
    let (xs, means) = distinct_means(x, y);
    let solution = if xs.len() < width {
        min_norm_interpolation(&xs, &means, degree, &scales)
    } else {
        for (col, &scale) in columns.iter_mut().zip(&scales) {
            for v in col.iter_mut() {
                *v /= scale;
            }
        }
        householder_lstsq(columns, y.to_vec())
    };
    let scaled = solution.ok_or_else(|| {
        TrendError::non_convergence("polynomial", "least-squares system is rank deficient")
    })?;

    let coefficients = scaled.iter().zip(&scales).map(|(c, s)| c / s).collect();
    Ok(Polynomial::new(coefficients))
}

/// Distinct `x` values in ascending order with the mean `y` at each.
fn distinct_means(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut xs: Vec<f64> = Vec::new();
    let mut sums: Vec<(f64, usize)> = Vec::new();
    for (xi, yi) in pairs {
        match (xs.last(), sums.last_mut()) {
            (Some(&last), Some((sum, count))) if last == xi => {
                *sum += yi;
                *count += 1;
            }
            _ => {
                xs.push(xi);
                sums.push((yi, 1));
            }
        }
    }
    let means = sums.into_iter().map(|(sum, count)| sum / count as f64).collect();
    (xs, means)
}

/// Smallest scaled coefficients `c` with `B·c = means`, where row `i` of `B`
/// is the scaled Vandermonde row of `xs[i]`.
///
/// `B` has full row rank for distinct `xs`, so `c = Bᵀ(B·Bᵀ)⁻¹·means`.
fn min_norm_interpolation(
    xs: &[f64],
    means: &[f64],
    degree: usize,
    scales: &[f64],
) -> Option<Vec<f64>> {
    let rows: Vec<Vec<f64>> = xs
        .iter()
        .map(|&xi| {
            scales
                .iter()
                .enumerate()
                .map(|(c, s)| xi.powi((degree - c) as i32) / s)
                .collect()
        })
        .collect();

    let gram: Vec<Vec<f64>> = rows
        .iter()
        .map(|a| {
            rows.iter()
                .map(|b| a.iter().zip(b).map(|(u, v)| u * v).sum())
                .collect()
        })
        .collect();
    let weights = solve_linear_system(&gram, means)?;

    let c: Vec<f64> = (0..scales.len())
        .map(|col| rows.iter().zip(&weights).map(|(row, w)| row[col] * w).sum())
        .collect();
    c.iter().all(|v| v.is_finite()).then_some(c)
}

/// Solve `min ‖A·c - b‖` for a full-column-rank `A` given as columns.
///
/// Returns `None` if `A` is rank deficient or contains non-finite values.
fn householder_lstsq(mut columns: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let m = columns.len();
    let n = b.len();
    if m > n {
        return None;
    }

    for j in 0..m {
        let norm = columns[j][j..].iter().map(|v| v * v).sum::<f64>().sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return None;
        }
        let alpha = if columns[j][j] > 0.0 { -norm } else { norm };

        let mut v: Vec<f64> = columns[j][j..].to_vec();
        v[0] -= alpha;
        let v_norm_sq: f64 = v.iter().map(|e| e * e).sum();
        if v_norm_sq == 0.0 {
            continue;
        }

        for col in columns.iter_mut().skip(j) {
            reflect(&v, v_norm_sq, &mut col[j..]);
        }
        reflect(&v, v_norm_sq, &mut b[j..]);
    }

    // Back substitution on the upper-triangular R
    let r_max = (0..m).map(|j| columns[j][j].abs()).fold(0.0, f64::max);
    let tolerance = r_max * (n as f64) * f64::EPSILON;
    let mut c = vec![0.0; m];
    for row in (0..m).rev() {
        let diag = columns[row][row];
        if diag.abs() <= tolerance {
            return None;
        }
        let mut sum = b[row];
        for col in (row + 1)..m {
            sum -= columns[col][row] * c[col];
        }
        c[row] = sum / diag;
    }

    if c.iter().all(|v| v.is_finite()) {
        Some(c)
    } else {
        None
    }
}

/// Apply the Householder reflection `I - 2vvᵀ/‖v‖²` to `target`.
fn reflect(v: &[f64], v_norm_sq: f64, target: &mut [f64]) {
    let dot: f64 = v.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
    let factor = 2.0 * dot / v_norm_sq;
    for (t, e) in target.iter_mut().zip(v) {
        *t -= factor * e;
    }
}
