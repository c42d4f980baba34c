//! Centered simple moving average with "same"-length output.
//!
//! For a window of `w`, output `i` averages the inputs at
//! `i - w/2 ..= i + (w-1)/2` (integer division), which for the default window
//! of 3 is `i-1 ..= i+1`. Positions outside the series are handled by an
//! explicit [`EdgePolicy`]:
//!
//! | policy              | edge value for `[y0, y1, ...]`, window 3 |
//! |---------------------|------------------------------------------|
//! | `ZeroPad` (default) | `y0·(1/3) + y1·(1/3)`                    |
//! | `Shrink`            | `(y0 + y1) / 2`                          |
//!
//! `ZeroPad` is a "same"-mode convolution with a uniform `1/w` kernel,
//! accumulating the weighted products left to right, so a flat series dips at
//! both ends. The output always has `n` values, including when `n < w`.

use trend_core::error::{Result, TrendError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the window treats positions outside the series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgePolicy {
    /// Average only the in-range neighbours.
    Shrink,
    /// Treat out-of-range neighbours as zero and keep the `1/w` weights.
    #[default]
    ZeroPad,
}

/// Configuration for the moving-average trend.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovingAverageConfig {
    /// Number of points in the window.
    pub window: usize,
    /// Edge convention.
    pub edge: EdgePolicy,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            window: 3,
            edge: EdgePolicy::ZeroPad,
        }
    }
}

impl MovingAverageConfig {
    /// Create a configuration with the given window and the default edge policy.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Set the edge policy.
    pub fn with_edge(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    /// Check the window is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::InvalidParameter`] for a zero window.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(TrendError::InvalidParameter {
                name: "window",
                value: "0".to_string(),
                expected: "at least 1",
            });
        }
        Ok(())
    }
}

/// Centered moving average of `data`, same length as the input.
///
/// # Errors
///
/// Returns [`TrendError::InvalidParameter`] for a zero window.
///
/// # Example
///
/// ```rust
/// use trend_models::smoothing::{centered_moving_average, EdgePolicy, MovingAverageConfig};
///
/// let padded = centered_moving_average(&[3.0, 6.0, 9.0, 12.0], &MovingAverageConfig::default())?;
/// assert_eq!(padded, vec![3.0, 6.0, 9.0, 7.0]);
///
/// let config = MovingAverageConfig::default().with_edge(EdgePolicy::Shrink);
/// let shrink = centered_moving_average(&[10.0, 10.0, 10.0], &config)?;
/// assert_eq!(shrink, vec![10.0, 10.0, 10.0]);
/// # Ok::<(), trend_core::TrendError>(())
/// ```
pub fn centered_moving_average(data: &[f64], config: &MovingAverageConfig) -> Result<Vec<f64>> {
    config.validate()?;

    let window = config.window;
    let n = data.len();
    let before = window / 2;
    let after = (window - 1) / 2;
    let weight = 1.0 / window as f64;

    let result = (0..n)
        .map(|i| {
            let lo = i.saturating_sub(before);
            let hi = (i + after).min(n - 1);
            let span = &data[lo..=hi];
            match config.edge {
                EdgePolicy::Shrink => span.iter().sum::<f64>() / span.len() as f64,
                EdgePolicy::ZeroPad => span.iter().fold(0.0, |acc, v| acc + v * weight),
            }
        })
        .collect();

    Ok(result)
}
