//! Nonlinear curve families and their shared solver.
//!
//! - Exponential: `a·e^(b·x) + c`
//! - Logarithmic: `a·ln(x + 1) + b`
//! - Power law: `a·(x + 1)^b`

mod exponential;
mod logarithmic;
mod power_law;
pub mod solver;

pub use exponential::Exponential;
pub use logarithmic::Logarithmic;
pub use power_law::PowerLaw;
pub use solver::{levenberg_marquardt, CurveSolution, SolverConfig, Termination};
