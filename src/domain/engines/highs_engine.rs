use std::ffi::{c_void, CStr, CString};
use std::ptr;

use highs_sys::*;

use crate::domain::engine::{Engine, EngineError, Parameter};
use crate::models::{Bounds, ObjectiveSense, ProblemModel, Termination, TerminationStatus, VariableType};

// HiGHS C API constants (highs_c_api.h)
const STATUS_ERROR: HighsInt = -1;
const MATRIX_FORMAT_ROW_WISE: HighsInt = 2;
const SENSE_MINIMIZE: HighsInt = 1;
const SENSE_MAXIMIZE: HighsInt = -1;

const MODEL_STATUS_PRESOLVE_ERROR: i32 = 3;
const MODEL_STATUS_SOLVE_ERROR: i32 = 4;
const MODEL_STATUS_POSTSOLVE_ERROR: i32 = 5;
const MODEL_STATUS_OPTIMAL: i32 = 7;
const MODEL_STATUS_INFEASIBLE: i32 = 8;
const MODEL_STATUS_UNBOUNDED_OR_INFEASIBLE: i32 = 9;
const MODEL_STATUS_UNBOUNDED: i32 = 10;
const MODEL_STATUS_TIME_LIMIT: i32 = 13;
const MODEL_STATUS_ITERATION_LIMIT: i32 = 14;
const MODEL_STATUS_SOLUTION_LIMIT: i32 = 16;

fn check(operation: &'static str, status: HighsInt) -> Result<(), EngineError> {
    // kHighsStatusWarning (1) still leaves a usable model
    if status == STATUS_ERROR {
        Err(EngineError::new(operation, status as i32))
    } else {
        Ok(())
    }
}

/// A HiGHS instance holding the submitted model
pub struct HighsProblem {
    ptr: *mut c_void,
    num_constraints: usize,
    num_variables: usize,
    is_mip: bool,
}

impl Drop for HighsProblem {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { Highs_destroy(self.ptr) };
            self.ptr = ptr::null_mut();
        }
    }
}

/// Options recorded until solve time; HiGHS keeps them on the instance
pub struct HighsSettings {
    parameters: Vec<Parameter>,
}

/// Results copied out of the instance right after `Highs_run`
pub struct HighsSolution {
    model_status: i32,
    objective_value: f64,
    run_time: f64,
    col_values: Result<Vec<f64>, EngineError>,
    mip_gap: Result<f64, EngineError>,
    mip_dual_bound: Result<f64, EngineError>,
}

/// HiGHS engine implementation
pub struct HighsEngine;

impl HighsEngine {
    pub fn new() -> Self {
        HighsEngine
    }

    /// Convert a HiGHS model status to our status
    fn convert_status(model_status: i32) -> TerminationStatus {
        match model_status {
            MODEL_STATUS_OPTIMAL => TerminationStatus::Optimal,
            MODEL_STATUS_INFEASIBLE => TerminationStatus::Infeasible,
            MODEL_STATUS_UNBOUNDED | MODEL_STATUS_UNBOUNDED_OR_INFEASIBLE => {
                TerminationStatus::Unbounded
            }
            MODEL_STATUS_TIME_LIMIT => TerminationStatus::TimeLimit,
            MODEL_STATUS_ITERATION_LIMIT => TerminationStatus::IterationLimit,
            MODEL_STATUS_SOLUTION_LIMIT => TerminationStatus::FeasibleFound,
            MODEL_STATUS_PRESOLVE_ERROR | MODEL_STATUS_SOLVE_ERROR | MODEL_STATUS_POSTSOLVE_ERROR => {
                TerminationStatus::NumericalError
            }
            _ => TerminationStatus::Unknown,
        }
    }

    fn apply(problem: &HighsProblem, parameter: &Parameter) -> Result<(), EngineError> {
        match parameter {
            Parameter::AbsolutePrimalTolerance(value) => check("Highs_setDoubleOptionValue", unsafe {
                Highs_setDoubleOptionValue(problem.ptr, c"primal_feasibility_tolerance".as_ptr(), *value)
            }),
            Parameter::TimeLimit(seconds) => check("Highs_setDoubleOptionValue", unsafe {
                Highs_setDoubleOptionValue(problem.ptr, c"time_limit".as_ptr(), *seconds)
            }),
            Parameter::ProblemOutputFile(path) => {
                let path = CString::new(path.to_string_lossy().as_bytes())
                    .map_err(|_| EngineError::new("Highs_writeModel", STATUS_ERROR as i32))?;
                check("Highs_writeModel", unsafe {
                    Highs_writeModel(problem.ptr, path.as_ptr())
                })
            }
        }
    }

    fn info_value(problem: &HighsProblem, name: &'static CStr) -> Result<f64, EngineError> {
        let mut value = 0.0;
        check("Highs_getDoubleInfoValue", unsafe {
            Highs_getDoubleInfoValue(problem.ptr, name.as_ptr(), &mut value)
        })?;
        Ok(value)
    }
}

impl Default for HighsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for HighsEngine {
    type Problem = HighsProblem;
    type Settings = HighsSettings;
    type Solution = HighsSolution;

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn create_ranged_problem(&self, model: &ProblemModel) -> Result<HighsProblem, EngineError> {
        let num_constraints = model.num_constraints();
        let num_variables = model.num_variables();
        if !model.is_consistent() {
            return Err(EngineError::new("Highs_passModel", STATUS_ERROR as i32));
        }

        let ptr = unsafe { Highs_create() };
        if ptr.is_null() {
            return Err(EngineError::new("Highs_create", STATUS_ERROR as i32));
        }
        // Owned from here so an error below still destroys the instance
        let problem = HighsProblem {
            ptr,
            num_constraints,
            num_variables,
            is_mip: model.has_integer_variables(),
        };
        unsafe { Highs_setBoolOptionValue(problem.ptr, c"output_flag".as_ptr(), 0) };

        // HiGHS has no null-bounds default: free rows, non-negative columns
        let free_rows;
        let rows = match &model.constraint_bounds {
            Some(bounds) => bounds,
            None => {
                free_rows = Bounds::free(num_constraints);
                &free_rows
            }
        };
        let default_cols;
        let cols = match &model.variable_bounds {
            Some(bounds) => bounds,
            None => {
                default_cols = Bounds {
                    lower: vec![0.0; num_variables],
                    upper: vec![f64::INFINITY; num_variables],
                };
                &default_cols
            }
        };

        let sense = match model.objective.sense {
            ObjectiveSense::Minimize => SENSE_MINIMIZE,
            ObjectiveSense::Maximize => SENSE_MAXIMIZE,
        };
        let row_starts: Vec<HighsInt> = model.matrix.row_offsets.iter().map(|&o| o as HighsInt).collect();
        let indices: Vec<HighsInt> = model.matrix.column_indices.iter().map(|&i| i as HighsInt).collect();

        let status = if problem.is_mip {
            let integrality: Vec<HighsInt> = model
                .variable_types
                .iter()
                .map(|t| match t {
                    VariableType::Continuous => 0,
                    VariableType::Integer => 1,
                })
                .collect();
            unsafe {
                Highs_passMip(
                    problem.ptr,
                    num_variables as HighsInt,
                    num_constraints as HighsInt,
                    model.nnz() as HighsInt,
                    MATRIX_FORMAT_ROW_WISE,
                    sense,
                    model.objective.offset,
                    model.objective.coefficients.as_ptr(),
                    cols.lower.as_ptr(),
                    cols.upper.as_ptr(),
                    rows.lower.as_ptr(),
                    rows.upper.as_ptr(),
                    row_starts.as_ptr(),
                    indices.as_ptr(),
                    model.matrix.values.as_ptr(),
                    integrality.as_ptr(),
                )
            }
        } else {
            unsafe {
                Highs_passLp(
                    problem.ptr,
                    num_variables as HighsInt,
                    num_constraints as HighsInt,
                    model.nnz() as HighsInt,
                    MATRIX_FORMAT_ROW_WISE,
                    sense,
                    model.objective.offset,
                    model.objective.coefficients.as_ptr(),
                    cols.lower.as_ptr(),
                    cols.upper.as_ptr(),
                    rows.lower.as_ptr(),
                    rows.upper.as_ptr(),
                    row_starts.as_ptr(),
                    indices.as_ptr(),
                    model.matrix.values.as_ptr(),
                )
            }
        };
        check(if problem.is_mip { "Highs_passMip" } else { "Highs_passLp" }, status)?;
        Ok(problem)
    }

    fn create_settings(&self) -> Result<HighsSettings, EngineError> {
        Ok(HighsSettings {
            parameters: Vec::new(),
        })
    }

    fn set_parameter(
        &self,
        settings: &mut HighsSettings,
        parameter: &Parameter,
    ) -> Result<(), EngineError> {
        settings.parameters.push(parameter.clone());
        Ok(())
    }

    fn solve(&self, problem: &HighsProblem, settings: &HighsSettings) -> Result<HighsSolution, EngineError> {
        for parameter in &settings.parameters {
            if let Err(err) = Self::apply(problem, parameter) {
                log::warn!("Could not set {}: {}", parameter.describe(), err);
            }
        }

        check("Highs_run", unsafe { Highs_run(problem.ptr) })?;

        let mut col_values = vec![0.0; problem.num_variables];
        let mut col_duals = vec![0.0; problem.num_variables];
        let mut row_values = vec![0.0; problem.num_constraints];
        let mut row_duals = vec![0.0; problem.num_constraints];
        let solution_status = unsafe {
            Highs_getSolution(
                problem.ptr,
                col_values.as_mut_ptr(),
                col_duals.as_mut_ptr(),
                row_values.as_mut_ptr(),
                row_duals.as_mut_ptr(),
            )
        };

        let (mip_gap, mip_dual_bound) = if problem.is_mip {
            (
                Self::info_value(problem, c"mip_gap"),
                Self::info_value(problem, c"mip_dual_bound"),
            )
        } else {
            let unavailable = EngineError::new("Highs_getDoubleInfoValue", STATUS_ERROR as i32);
            (Err(unavailable.clone()), Err(unavailable))
        };

        Ok(HighsSolution {
            model_status: unsafe { Highs_getModelStatus(problem.ptr) } as i32,
            objective_value: unsafe { Highs_getObjectiveValue(problem.ptr) },
            run_time: unsafe { Highs_getRunTime(problem.ptr) },
            col_values: check("Highs_getSolution", solution_status).map(|_| col_values),
            mip_gap,
            mip_dual_bound,
        })
    }

    fn termination(&self, solution: &HighsSolution) -> Result<Termination, EngineError> {
        Ok(Termination {
            status: Self::convert_status(solution.model_status),
            code: solution.model_status,
        })
    }

    fn objective_value(&self, solution: &HighsSolution) -> Result<f64, EngineError> {
        Ok(solution.objective_value)
    }

    fn solve_time(&self, solution: &HighsSolution) -> Result<f64, EngineError> {
        Ok(solution.run_time)
    }

    fn primal_solution(
        &self,
        solution: &HighsSolution,
        num_variables: usize,
    ) -> Result<Vec<f64>, EngineError> {
        let mut values = solution.col_values.clone()?;
        values.resize(num_variables, 0.0);
        Ok(values)
    }

    fn is_mip(&self, problem: &HighsProblem) -> Result<bool, EngineError> {
        Ok(problem.is_mip)
    }

    fn mip_gap(&self, solution: &HighsSolution) -> Result<f64, EngineError> {
        solution.mip_gap.clone()
    }

    fn solution_bound(&self, solution: &HighsSolution) -> Result<f64, EngineError> {
        solution.mip_dual_bound.clone()
    }

    fn destroy_problem(&self, problem: HighsProblem) {
        drop(problem);
    }

    fn destroy_settings(&self, settings: HighsSettings) {
        drop(settings);
    }

    fn destroy_solution(&self, solution: HighsSolution) {
        drop(solution);
    }
}
