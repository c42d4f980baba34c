//! Polynomial least-squares regression (linear and quadratic trends).

mod polyfit;

pub use polyfit::{polyfit, Polynomial};
