//! Smoothing trends.
//!
//! A smoothed series has no closed form to extrapolate, so its forecast is the
//! last smoothed value held flat.

mod moving_average;

pub use moving_average::{centered_moving_average, EdgePolicy, MovingAverageConfig};
