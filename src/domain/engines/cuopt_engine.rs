use cuopt::{termination, CuoptError, Problem, RangedProblem, Sense, Solution, SolverSettings, VarType};

use crate::domain::engine::{Engine, EngineError, Parameter};
use crate::models::{ObjectiveSense, ProblemModel, Termination, TerminationStatus, VariableType};

/// cuOpt engine implementation
pub struct CuoptEngine;

impl CuoptEngine {
    pub fn new() -> Self {
        CuoptEngine
    }

    /// Convert a cuOpt termination code to our status
    fn convert_status(code: i32) -> TerminationStatus {
        match code {
            termination::OPTIMAL => TerminationStatus::Optimal,
            termination::INFEASIBLE => TerminationStatus::Infeasible,
            termination::UNBOUNDED => TerminationStatus::Unbounded,
            termination::ITERATION_LIMIT => TerminationStatus::IterationLimit,
            termination::TIME_LIMIT => TerminationStatus::TimeLimit,
            termination::NUMERICAL_ERROR => TerminationStatus::NumericalError,
            termination::PRIMAL_FEASIBLE => TerminationStatus::PrimalFeasible,
            termination::FEASIBLE_FOUND => TerminationStatus::FeasibleFound,
            _ => TerminationStatus::Unknown,
        }
    }
}

impl Default for CuoptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CuoptError> for EngineError {
    fn from(e: CuoptError) -> Self {
        EngineError::new(e.call, e.status)
    }
}

impl Engine for CuoptEngine {
    type Problem = Problem;
    type Settings = SolverSettings;
    type Solution = Solution;

    fn name(&self) -> &str {
        "cuOpt"
    }

    fn create_ranged_problem(&self, model: &ProblemModel) -> Result<Problem, EngineError> {
        let variable_types: Vec<VarType> = model
            .variable_types
            .iter()
            .map(|t| match t {
                VariableType::Continuous => VarType::Continuous,
                VariableType::Integer => VarType::Integer,
            })
            .collect();

        let sense = match model.objective.sense {
            ObjectiveSense::Minimize => Sense::Minimize,
            ObjectiveSense::Maximize => Sense::Maximize,
        };

        let constraints = model.constraint_bounds.as_ref();
        let variables = model.variable_bounds.as_ref();

        Ok(Problem::ranged(&RangedProblem {
            sense,
            objective_offset: model.objective.offset,
            objective_coefficients: &model.objective.coefficients,
            row_offsets: &model.matrix.row_offsets,
            column_indices: &model.matrix.column_indices,
            values: &model.matrix.values,
            constraint_lower_bounds: constraints.map(|b| b.lower.as_slice()),
            constraint_upper_bounds: constraints.map(|b| b.upper.as_slice()),
            variable_lower_bounds: variables.map(|b| b.lower.as_slice()),
            variable_upper_bounds: variables.map(|b| b.upper.as_slice()),
            variable_types: &variable_types,
        })?)
    }

    fn create_settings(&self) -> Result<SolverSettings, EngineError> {
        Ok(SolverSettings::new()?)
    }

    fn set_parameter(
        &self,
        settings: &mut SolverSettings,
        parameter: &Parameter,
    ) -> Result<(), EngineError> {
        match parameter {
            Parameter::AbsolutePrimalTolerance(value) => {
                settings.set_float("absolute_primal_tolerance", *value)?
            }
            Parameter::TimeLimit(seconds) => settings.set_float("time_limit", *seconds)?,
            Parameter::ProblemOutputFile(path) => {
                settings.set("user_problem_file", &path.to_string_lossy())?
            }
        }
        Ok(())
    }

    fn solve(&self, problem: &Problem, settings: &SolverSettings) -> Result<Solution, EngineError> {
        Ok(problem.solve(settings)?)
    }

    fn termination(&self, solution: &Solution) -> Result<Termination, EngineError> {
        let code = solution.termination_status()?;
        Ok(Termination {
            status: Self::convert_status(code),
            code,
        })
    }

    fn objective_value(&self, solution: &Solution) -> Result<f64, EngineError> {
        Ok(solution.objective_value()?)
    }

    fn solve_time(&self, solution: &Solution) -> Result<f64, EngineError> {
        Ok(solution.solve_time()?)
    }

    // The solution knows its own column count
    fn primal_solution(
        &self,
        solution: &Solution,
        _num_variables: usize,
    ) -> Result<Vec<f64>, EngineError> {
        Ok(solution.primal_solution()?)
    }

    fn is_mip(&self, problem: &Problem) -> Result<bool, EngineError> {
        Ok(problem.is_mip()?)
    }

    fn mip_gap(&self, solution: &Solution) -> Result<f64, EngineError> {
        Ok(solution.mip_gap()?)
    }

    fn solution_bound(&self, solution: &Solution) -> Result<f64, EngineError> {
        Ok(solution.solution_bound()?)
    }

    // The cuopt handles release themselves on drop
    fn destroy_problem(&self, problem: Problem) {
        drop(problem);
    }

    fn destroy_settings(&self, settings: SolverSettings) {
        drop(settings);
    }

    fn destroy_solution(&self, solution: Solution) {
        drop(solution);
    }
}
