use std::path::PathBuf;
use thiserror::Error;

use crate::models::{ProblemModel, Termination};

/// A non-success status returned by an engine call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed with status {status}")]
pub struct EngineError {
    pub operation: &'static str,
    pub status: i32,
}

impl EngineError {
    /// Status used when a lifecycle step runs without the handle it needs
    pub const MISSING_HANDLE: i32 = -1;

    pub fn new(operation: &'static str, status: i32) -> Self {
        EngineError { operation, status }
    }
}

/// A tunable applied to a settings handle
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    AbsolutePrimalTolerance(f64),
    /// Wall-clock limit in seconds
    TimeLimit(f64),
    /// Also write the submitted model to this file in MPS format
    ProblemOutputFile(PathBuf),
}

impl Parameter {
    pub fn describe(&self) -> &'static str {
        match self {
            Parameter::AbsolutePrimalTolerance(_) => "primal tolerance",
            Parameter::TimeLimit(_) => "time limit",
            Parameter::ProblemOutputFile(_) => "MPS output file",
        }
    }
}

/// Common interface for optimization engines.
///
/// Handles are opaque capability tokens. Each `destroy_*` consumes its
/// handle, so a handle can be released at most once.
pub trait Engine {
    type Problem;
    type Settings;
    type Solution;

    /// Engine name for logging
    fn name(&self) -> &str;

    /// Submit the model in ranged form and obtain a problem handle
    fn create_ranged_problem(&self, model: &ProblemModel) -> Result<Self::Problem, EngineError>;

    fn create_settings(&self) -> Result<Self::Settings, EngineError>;

    fn set_parameter(
        &self,
        settings: &mut Self::Settings,
        parameter: &Parameter,
    ) -> Result<(), EngineError>;

    fn solve(
        &self,
        problem: &Self::Problem,
        settings: &Self::Settings,
    ) -> Result<Self::Solution, EngineError>;

    fn termination(&self, solution: &Self::Solution) -> Result<Termination, EngineError>;

    fn objective_value(&self, solution: &Self::Solution) -> Result<f64, EngineError>;

    /// Solve wall time in seconds
    fn solve_time(&self, solution: &Self::Solution) -> Result<f64, EngineError>;

    fn primal_solution(
        &self,
        solution: &Self::Solution,
        num_variables: usize,
    ) -> Result<Vec<f64>, EngineError>;

    /// Whether the engine classifies the submitted problem as a MIP
    fn is_mip(&self, problem: &Self::Problem) -> Result<bool, EngineError>;

    fn mip_gap(&self, solution: &Self::Solution) -> Result<f64, EngineError>;

    fn solution_bound(&self, solution: &Self::Solution) -> Result<f64, EngineError>;

    fn destroy_problem(&self, problem: Self::Problem);

    fn destroy_settings(&self, settings: Self::Settings);

    fn destroy_solution(&self, solution: Self::Solution);
}
