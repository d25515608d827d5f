// ============================================================
// Layer 3 — Hyperparameters
// ============================================================
// The configuration file is loaded as an untyped JSON mapping
// (see infra::config_loader). This module is the separate,
// explicit validation step that turns the mapping into a typed
// Hyperparameters value:
//
//   {"C": 1.0, "solver": "lbfgs", "max_iter": 1000}
//        │
//        ▼
//   Hyperparameters { c: 1.0, solver: Lbfgs, max_iter: 1000, .. }
//
// Required keys:  C (number > 0), solver (string), max_iter (integer > 0)
// Optional keys:  tol, learning_rate (numbers > 0), batch_size (integer > 0)
//
// Reference: serde_json::Value documentation

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::PipelineError;

/// The raw configuration mapping: hyperparameter name → JSON value
pub type ConfigMap = serde_json::Map<String, Value>;

pub const DEFAULT_TOL: f64 = 1e-4;
pub const DEFAULT_LEARNING_RATE: f64 = 1e-2;
pub const DEFAULT_BATCH_SIZE: usize = 64;

// ─── Solver ───────────────────────────────────────────────────────────────────
/// Optimisation routine used to fit the multinomial linear model.
///
/// `Lbfgs` is a full-batch quasi-Newton method (linfa-logistic).
/// The others are mini-batch first-order methods (burn optimisers),
/// for which `max_iter` counts epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    Lbfgs,
    Sgd,
    Adam,
    RmsProp,
}

impl Solver {
    pub fn as_str(self) -> &'static str {
        match self {
            Solver::Lbfgs   => "lbfgs",
            Solver::Sgd     => "sgd",
            Solver::Adam    => "adam",
            Solver::RmsProp => "rmsprop",
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Solver {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lbfgs"   => Ok(Solver::Lbfgs),
            "sgd"     => Ok(Solver::Sgd),
            "adam"    => Ok(Solver::Adam),
            "rmsprop" => Ok(Solver::RmsProp),
            _         => Err(PipelineError::UnsupportedSolver(s.to_string())),
        }
    }
}

// ─── Hyperparameters ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Inverse L2 regularisation strength (sklearn's `C`)
    pub c:             f64,
    pub solver:        Solver,
    /// L-BFGS iterations, or epochs for the gradient solvers
    pub max_iter:      usize,
    /// L-BFGS gradient tolerance; for the mini-batch solvers, the
    /// final-epoch loss change below which the fit counts as converged
    pub tol:           f64,
    pub learning_rate: f64,
    pub batch_size:    usize,
}

impl Hyperparameters {
    /// Validate a raw configuration mapping.
    ///
    /// Unknown keys are ignored so a config file can carry notes
    /// or settings for other tools.
    pub fn from_config(config: &ConfigMap) -> Result<Self, PipelineError> {
        let c = positive_number(config, "C")?
            .ok_or(PipelineError::MissingHyperparameter("C"))?;

        let solver = match config.get("solver") {
            None                    => return Err(PipelineError::MissingHyperparameter("solver")),
            Some(Value::String(s))  => s.parse::<Solver>()?,
            Some(_)                 => {
                return Err(PipelineError::InvalidHyperparameter {
                    key:      "solver",
                    expected: "a string",
                })
            }
        };

        let max_iter = positive_integer(config, "max_iter")?
            .ok_or(PipelineError::MissingHyperparameter("max_iter"))?;

        Ok(Self {
            c,
            solver,
            max_iter,
            tol:           positive_number(config, "tol")?.unwrap_or(DEFAULT_TOL),
            learning_rate: positive_number(config, "learning_rate")?.unwrap_or(DEFAULT_LEARNING_RATE),
            batch_size:    positive_integer(config, "batch_size")?.unwrap_or(DEFAULT_BATCH_SIZE),
        })
    }

    /// L2 penalty coefficient applied to the weights (1 / C)
    pub fn alpha(&self) -> f64 {
        1.0 / self.c
    }
}

/// Read an optional finite number > 0. JSON integers count as numbers.
fn positive_number(config: &ConfigMap, key: &'static str) -> Result<Option<f64>, PipelineError> {
    let Some(value) = config.get(key) else {
        return Ok(None);
    };
    match value.as_f64() {
        Some(v) if v.is_finite() && v > 0.0 => Ok(Some(v)),
        _ => Err(PipelineError::InvalidHyperparameter {
            key,
            expected: "a positive number",
        }),
    }
}

/// Read an optional integer > 0. Floats such as `100.0` are rejected.
fn positive_integer(config: &ConfigMap, key: &'static str) -> Result<Option<usize>, PipelineError> {
    let Some(value) = config.get(key) else {
        return Ok(None);
    };
    match value.as_u64() {
        Some(v) if v > 0 => Ok(Some(v as usize)),
        _ => Err(PipelineError::InvalidHyperparameter {
            key,
            expected: "a positive integer",
        }),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> ConfigMap {
        match v {
            Value::Object(m) => m,
            _ => panic!("test config must be an object"),
        }
    }

    #[test]
    fn test_valid_config() {
        let cfg = map(json!({"C": 1.0, "solver": "lbfgs", "max_iter": 1000}));
        let hp  = Hyperparameters::from_config(&cfg).unwrap();
        assert_eq!(hp.c, 1.0);
        assert_eq!(hp.solver, Solver::Lbfgs);
        assert_eq!(hp.max_iter, 1000);
        // Optional keys fall back to defaults
        assert_eq!(hp.tol, DEFAULT_TOL);
        assert_eq!(hp.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_integer_c_is_a_number() {
        let cfg = map(json!({"C": 2, "solver": "adam", "max_iter": 5}));
        let hp  = Hyperparameters::from_config(&cfg).unwrap();
        assert_eq!(hp.c, 2.0);
        assert!((hp.alpha() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_keys() {
        for key in ["C", "solver", "max_iter"] {
            let mut cfg = map(json!({"C": 1.0, "solver": "lbfgs", "max_iter": 10}));
            cfg.remove(key);
            match Hyperparameters::from_config(&cfg) {
                Err(PipelineError::MissingHyperparameter(k)) => assert_eq!(k, key),
                other => panic!("expected missing '{key}', got {other:?}"),
            }
        }
    }

    #[test]
    fn test_wrong_types_rejected() {
        let bad = [
            json!({"C": "1.0", "solver": "lbfgs", "max_iter": 10}),
            json!({"C": 1.0, "solver": 3, "max_iter": 10}),
            json!({"C": 1.0, "solver": "lbfgs", "max_iter": 10.5}),
            json!({"C": -1.0, "solver": "lbfgs", "max_iter": 10}),
            json!({"C": 1.0, "solver": "lbfgs", "max_iter": 0}),
        ];
        for cfg in bad {
            assert!(matches!(
                Hyperparameters::from_config(&map(cfg)),
                Err(PipelineError::InvalidHyperparameter { .. })
            ));
        }
    }

    #[test]
    fn test_unknown_solver() {
        let cfg = map(json!({"C": 1.0, "solver": "newton-cg", "max_iter": 10}));
        assert!(matches!(
            Hyperparameters::from_config(&cfg),
            Err(PipelineError::UnsupportedSolver(s)) if s == "newton-cg"
        ));
    }

    #[test]
    fn test_solver_names_round_trip() {
        for s in [Solver::Lbfgs, Solver::Sgd, Solver::Adam, Solver::RmsProp] {
            assert_eq!(s.as_str().parse::<Solver>().unwrap(), s);
        }
    }
}
