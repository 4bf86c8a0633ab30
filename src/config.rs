use std::env;
use std::path::PathBuf;

use crate::domain::engine::Parameter;
use crate::domain::engine_factory::EngineType;
use crate::timing::Timing;

pub const DEFAULT_PRIMAL_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_TIME_LIMIT: f64 = 300.0;

pub const PRIMAL_TOLERANCE_VAR: &str = "CUOPT_JSON_PRIMAL_TOLERANCE";
pub const TIME_LIMIT_VAR: &str = "CUOPT_JSON_TIME_LIMIT";
pub const ENGINE_VAR: &str = "CUOPT_JSON_ENGINE";

/// Run configuration, fixed before the first phase starts
#[derive(Debug, Clone, PartialEq)]
pub struct SolveConfig {
    pub primal_tolerance: f64,
    /// Engine wall-clock limit in seconds
    pub time_limit: f64,
    /// Also write the submitted model here in MPS format
    pub problem_output: Option<PathBuf>,
    pub timing: bool,
    /// `None` selects the default backend
    pub engine: Option<EngineType>,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            primal_tolerance: DEFAULT_PRIMAL_TOLERANCE,
            time_limit: DEFAULT_TIME_LIMIT,
            problem_output: None,
            timing: false,
            engine: None,
        }
    }
}

impl SolveConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by `lookup`; unparsable values keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = SolveConfig::default();
        let primal_tolerance = lookup(PRIMAL_TOLERANCE_VAR)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.primal_tolerance);
        let time_limit = lookup(TIME_LIMIT_VAR)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.time_limit);
        let engine = lookup(ENGINE_VAR).and_then(|name| {
            let engine = EngineType::from_str(name.trim());
            if engine.is_none() {
                log::warn!("Ignoring {}={}: engine not available", ENGINE_VAR, name);
            }
            engine
        });

        SolveConfig {
            primal_tolerance,
            time_limit,
            engine,
            ..defaults
        }
    }

    /// Parameters applied to the settings handle, in application order
    pub fn engine_parameters(&self) -> Vec<Parameter> {
        let mut parameters = vec![
            Parameter::AbsolutePrimalTolerance(self.primal_tolerance),
            Parameter::TimeLimit(self.time_limit),
        ];
        if let Some(path) = &self.problem_output {
            parameters.push(Parameter::ProblemOutputFile(path.clone()));
        }
        parameters
    }

    pub fn timing(&self) -> Timing {
        Timing::new(self.timing)
    }
}
