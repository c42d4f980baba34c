//! Model kinds and the strategy table that dispatches them.

use core::fmt;
use core::str::FromStr;

use trend_core::{error::TrendError, traits::CurveModel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::curve::{Exponential, Logarithmic, PowerLaw};

static EXPONENTIAL: Exponential = Exponential;
static LOGARITHMIC: Logarithmic = Logarithmic;
static POWER_LAW: PowerLaw = PowerLaw;

/// Curve family requested for a trend line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum ModelKind {
    /// Least-squares straight line.
    Linear,
    /// Least-squares quadratic.
    Polynomial,
    /// `a·e^(b·x) + c`.
    Exponential,
    /// `a·ln(x + 1) + b`.
    Logarithmic,
    /// `a·(x + 1)^b`.
    PowerLaw,
    /// Centered moving average, forecast held flat.
    MovingAverage,
}

/// How a model kind is computed.
#[derive(Clone, Copy)]
pub enum Strategy {
    /// Least-squares polynomial of the given degree.
    Polynomial {
        /// Polynomial degree.
        degree: usize,
    },
    /// Nonlinear curve fitted by the shared solver.
    Curve(&'static dyn CurveModel),
    /// Centered moving average.
    MovingAverage,
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Polynomial { degree } => {
                f.debug_struct("Polynomial").field("degree", degree).finish()
            }
            Strategy::Curve(model) => f.debug_tuple("Curve").field(&model.name()).finish(),
            Strategy::MovingAverage => f.write_str("MovingAverage"),
        }
    }
}

impl ModelKind {
    /// All supported model kinds.
    pub const ALL: [ModelKind; 6] = [
        ModelKind::Linear,
        ModelKind::Polynomial,
        ModelKind::Exponential,
        ModelKind::Logarithmic,
        ModelKind::PowerLaw,
        ModelKind::MovingAverage,
    ];

    /// Canonical name.
    pub const fn as_str(self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Polynomial => "polynomial",
            ModelKind::Exponential => "exponential",
            ModelKind::Logarithmic => "logarithmic",
            ModelKind::PowerLaw => "power-law",
            ModelKind::MovingAverage => "moving_average",
        }
    }

    /// Strategy-table entry for this kind.
    pub fn strategy(self) -> Strategy {
        match self {
            ModelKind::Linear => Strategy::Polynomial { degree: 1 },
            ModelKind::Polynomial => Strategy::Polynomial { degree: 2 },
            ModelKind::Exponential => Strategy::Curve(&EXPONENTIAL),
            ModelKind::Logarithmic => Strategy::Curve(&LOGARITHMIC),
            ModelKind::PowerLaw => Strategy::Curve(&POWER_LAW),
            ModelKind::MovingAverage => Strategy::MovingAverage,
        }
    }

    /// Fewest observations this kind can be fitted to.
    pub fn min_points(self) -> usize {
        match self.strategy() {
            Strategy::Curve(model) => model.min_points(),
            Strategy::Polynomial { .. } | Strategy::MovingAverage => 1,
        }
    }

    /// Returns `true` for kinds fitted by the nonlinear solver.
    pub fn is_nonlinear(self) -> bool {
        matches!(self.strategy(), Strategy::Curve(_))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(ModelKind::Linear),
            "polynomial" => Ok(ModelKind::Polynomial),
            "exponential" => Ok(ModelKind::Exponential),
            "logarithmic" => Ok(ModelKind::Logarithmic),
            "power-law" | "power_law" => Ok(ModelKind::PowerLaw),
            "moving_average" | "moving-average" => Ok(ModelKind::MovingAverage),
            _ => Err(TrendError::UnknownModel(s.to_string())),
        }
    }
}

impl TryFrom<String> for ModelKind {
    type Error = TrendError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModelKind> for String {
    fn from(kind: ModelKind) -> Self {
        kind.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.as_str().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("moving-average".parse::<ModelKind>().unwrap(), ModelKind::MovingAverage);
        assert_eq!("power_law".parse::<ModelKind>().unwrap(), ModelKind::PowerLaw);
        assert_eq!(" Linear ".parse::<ModelKind>().unwrap(), ModelKind::Linear);
    }

    #[test]
    fn test_unknown_kind_is_configuration_error() {
        let err = "quadratic-spline".parse::<ModelKind>().unwrap_err();
        assert_eq!(err, TrendError::UnknownModel("quadratic-spline".to_string()));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_strategy_table() {
        assert!(matches!(ModelKind::Linear.strategy(), Strategy::Polynomial { degree: 1 }));
        assert!(matches!(ModelKind::Polynomial.strategy(), Strategy::Polynomial { degree: 2 }));
        assert!(matches!(ModelKind::MovingAverage.strategy(), Strategy::MovingAverage));
        match ModelKind::PowerLaw.strategy() {
            Strategy::Curve(model) => assert_eq!(model.name(), "power-law"),
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn test_min_points() {
        assert_eq!(ModelKind::Linear.min_points(), 1);
        assert_eq!(ModelKind::MovingAverage.min_points(), 1);
        assert_eq!(ModelKind::Exponential.min_points(), 3);
        assert_eq!(ModelKind::Logarithmic.min_points(), 2);
        assert_eq!(ModelKind::PowerLaw.min_points(), 2);
        assert!(ModelKind::Exponential.is_nonlinear());
        assert!(!ModelKind::Linear.is_nonlinear());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&ModelKind::PowerLaw).unwrap();
        assert_eq!(json, "\"power-law\"");
        let kind: ModelKind = serde_json::from_str("\"moving-average\"").unwrap();
        assert_eq!(kind, ModelKind::MovingAverage);
        assert!(serde_json::from_str::<ModelKind>("\"cubic\"").is_err());
    }
}
