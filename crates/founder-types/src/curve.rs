//! Scalar response curves used by catalog definitions and strategies.
//!
//! Content authors express growth and scaling as simple curves. Evaluation
//! clamps to the end keys outside the authored range.
//!
//! Curves are written as a single-key map in both YAML and JSON:
//! `constant: 1.0` or `linear: { from: [x0, y0], to: [x1, y1] }`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A one-dimensional curve mapping an input (level, quality, ...) to a factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/", rename_all = "snake_case")]
#[serde(try_from = "CurveMap", into = "CurveMap")]
pub enum Curve {
    /// The same value for every input.
    Constant(f64),
    /// Straight line between two keys, flat beyond them.
    Linear {
        /// First key as `(input, output)`.
        from: (f64, f64),
        /// Second key as `(input, output)`.
        to: (f64, f64),
    },
}

impl Curve {
    /// Straight line from `(x0, y0)` to `(x1, y1)`.
    pub const fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Linear {
            from: (x0, y0),
            to: (x1, y1),
        }
    }

    /// Evaluate the curve at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            Self::Constant(value) => value,
            Self::Linear {
                from: (x0, y0),
                to: (x1, y1),
            } => {
                let span = x1 - x0;
                if span.abs() < f64::EPSILON {
                    return y0;
                }
                let t = ((x - x0) / span).clamp(0.0, 1.0);
                y0 + (y1 - y0) * t
            }
        }
    }
}

/// Wire form of a [`Curve`]: exactly one of the keys is set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CurveMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    constant: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    linear: Option<LinearKeys>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinearKeys {
    from: (f64, f64),
    to: (f64, f64),
}

impl TryFrom<CurveMap> for Curve {
    type Error = String;

    fn try_from(map: CurveMap) -> Result<Self, Self::Error> {
        match (map.constant, map.linear) {
            (Some(value), None) => Ok(Self::Constant(value)),
            (None, Some(keys)) => Ok(Self::Linear {
                from: keys.from,
                to: keys.to,
            }),
            (None, None) => Err("curve needs a `constant` or `linear` key".to_owned()),
            (Some(_), Some(_)) => Err("curve takes only one of `constant` and `linear`".to_owned()),
        }
    }
}

impl From<Curve> for CurveMap {
    fn from(curve: Curve) -> Self {
        match curve {
            Curve::Constant(value) => Self {
                constant: Some(value),
                linear: None,
            },
            Curve::Linear { from, to } => Self {
                constant: None,
                linear: Some(LinearKeys { from, to }),
            },
        }
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::Constant(1.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn constant_ignores_input() {
        let curve = Curve::Constant(2.5);
        assert!(close(curve.evaluate(-10.0), 2.5));
        assert!(close(curve.evaluate(1e6), 2.5));
    }

    #[test]
    fn linear_interpolates_and_clamps() {
        let curve = Curve::linear(0.0, 0.5, 100.0, 1.5);
        assert!(close(curve.evaluate(50.0), 1.0));
        assert!(close(curve.evaluate(-20.0), 0.5));
        assert!(close(curve.evaluate(400.0), 1.5));
    }

    #[test]
    fn degenerate_linear_returns_first_key() {
        let curve = Curve::linear(3.0, 7.0, 3.0, 9.0);
        assert!(close(curve.evaluate(3.0), 7.0));
    }

    #[test]
    fn curve_reads_json_map_form() {
        let json = r#"{"linear":{"from":[1.0,1.0],"to":[10.0,5.0]}}"#;
        let parsed: Result<Curve, _> = serde_json::from_str(json);
        assert_eq!(parsed.ok(), Some(Curve::linear(1.0, 1.0, 10.0, 5.0)));
        assert_eq!(
            serde_json::to_string(&Curve::Constant(2.0)).ok().as_deref(),
            Some(r#"{"constant":2.0}"#)
        );
    }

    #[test]
    fn curve_reads_yaml_map_form() {
        let linear: Result<Curve, _> = serde_yml::from_str("linear: { from: [0, 0.5], to: [100.0, 1.5] }");
        assert_eq!(linear.ok(), Some(Curve::linear(0.0, 0.5, 100.0, 1.5)));

        let nested: Result<BTreeMap<String, Curve>, _> =
            serde_yml::from_str("difficulty:\n  linear: { from: [1.0, 1.0], to: [10.0, 3.0] }\nflat:\n  constant: 1.0\n");
        let nested = nested.ok();
        assert_eq!(
            nested.as_ref().and_then(|m| m.get("difficulty")).copied(),
            Some(Curve::linear(1.0, 1.0, 10.0, 3.0))
        );
        assert_eq!(nested.as_ref().and_then(|m| m.get("flat")).copied(), Some(Curve::Constant(1.0)));
    }

    #[test]
    fn curve_with_both_or_no_keys_rejected() {
        assert!(serde_yml::from_str::<Curve>("constant: 1.0\nlinear: { from: [0, 0], to: [1, 1] }").is_err());
        assert!(serde_yml::from_str::<Curve>("{}").is_err());
        assert!(serde_yml::from_str::<Curve>("quadratic: 2.0").is_err());
    }
}
