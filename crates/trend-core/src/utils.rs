//! Numeric helpers shared by the regression and curve-fitting code.

/// Evaluate a polynomial with coefficients ordered from the highest degree
/// down to the constant term (Horner's scheme).
///
/// # Example
///
/// ```rust
/// use trend_core::utils::polyval;
///
/// // 2x^2 - 3x + 1 at x = 2
/// assert_eq!(polyval(&[2.0, -3.0, 1.0], 2.0), 3.0);
/// assert_eq!(polyval(&[], 5.0), 0.0);
/// ```
#[must_use]
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Solve the square system `a * x = b` by Gaussian elimination with partial
/// pivoting.
///
/// `a` is row-major with `b.len()` rows. Returns `None` when the matrix is
/// singular or contains non-finite entries.
#[must_use]
pub fn solve_linear_system(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let k = b.len();
    if a.len() != k || a.iter().any(|row| row.len() != k) {
        return None;
    }

    // Augmented matrix [a | b]
    let mut m: Vec<Vec<f64>> = a
        .iter()
        .zip(b)
        .map(|(row, &rhs)| {
            let mut r = row.clone();
            r.push(rhs);
            r
        })
        .collect();

    for col in 0..k {
        let pivot = (col..k).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        let pivot_value = m[pivot][col];
        if !pivot_value.is_finite() || pivot_value.abs() < f64::MIN_POSITIVE {
            return None;
        }
        m.swap(col, pivot);

        for row in (col + 1)..k {
            let factor = m[row][col] / m[col][col];
            if factor == 0.0 {
                continue;
            }
            for j in col..=k {
                m[row][j] -= factor * m[col][j];
            }
        }
    }

    let mut x = vec![0.0; k];
    for row in (0..k).rev() {
        let mut sum = m[row][k];
        for j in (row + 1)..k {
            sum -= m[row][j] * x[j];
        }
        x[row] = sum / m[row][row];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

/// Euclidean norm.
#[must_use]
pub fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Largest absolute value, or zero for an empty slice.
#[must_use]
pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
}
