//! Safe Rust bindings for the cuOpt linear programming C API
//!
//! Every engine object is an owned handle that releases itself on drop,
//! so a problem, settings object or solution is destroyed exactly once.

use cuopt_sys::*;
use std::ffi::{CString, NulError};
use std::fmt;
use std::os::raw::c_char;
use std::ptr;

/// Error raised when a cuOpt call returns a non-success status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuoptError {
    pub call: &'static str,
    pub status: i32,
}

impl fmt::Display for CuoptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} returned status {}", self.call, self.status)
    }
}

impl std::error::Error for CuoptError {}

fn check(call: &'static str, status: cuopt_int_t) -> Result<(), CuoptError> {
    if status == CUOPT_SUCCESS as cuopt_int_t {
        Ok(())
    } else {
        Err(CuoptError { call, status })
    }
}

impl CuoptError {
    /// Status for arguments rejected before reaching cuOpt
    pub const INVALID_ARGUMENT: i32 = -1;

    fn invalid(call: &'static str) -> Self {
        CuoptError {
            call,
            status: Self::INVALID_ARGUMENT,
        }
    }
}

fn c_string(call: &'static str, value: &str) -> Result<CString, CuoptError> {
    CString::new(value).map_err(|_: NulError| CuoptError::invalid(call))
}

/// Objective direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    fn raw(self) -> cuopt_int_t {
        match self {
            Sense::Minimize => CUOPT_MINIMIZE as cuopt_int_t,
            Sense::Maximize => CUOPT_MAXIMIZE as cuopt_int_t,
        }
    }
}

/// Variable class as understood by cuOpt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Continuous,
    Integer,
}

impl VarType {
    fn raw(self) -> c_char {
        match self {
            VarType::Continuous => CUOPT_CONTINUOUS as c_char,
            VarType::Integer => CUOPT_INTEGER as c_char,
        }
    }
}

/// Termination status codes reported by `cuOptGetTerminationStatus`
pub mod termination {
    use cuopt_sys::*;

    pub const OPTIMAL: i32 = CUOPT_TERIMINATION_STATUS_OPTIMAL as i32;
    pub const INFEASIBLE: i32 = CUOPT_TERIMINATION_STATUS_INFEASIBLE as i32;
    pub const UNBOUNDED: i32 = CUOPT_TERIMINATION_STATUS_UNBOUNDED as i32;
    pub const ITERATION_LIMIT: i32 = CUOPT_TERIMINATION_STATUS_ITERATION_LIMIT as i32;
    pub const TIME_LIMIT: i32 = CUOPT_TERIMINATION_STATUS_TIME_LIMIT as i32;
    pub const NUMERICAL_ERROR: i32 = CUOPT_TERIMINATION_STATUS_NUMERICAL_ERROR as i32;
    pub const PRIMAL_FEASIBLE: i32 = CUOPT_TERIMINATION_STATUS_PRIMAL_FEASIBLE as i32;
    pub const FEASIBLE_FOUND: i32 = CUOPT_TERIMINATION_STATUS_FEASIBLE_FOUND as i32;
}

/// Borrowed CSR data for `cuOptCreateRangedProblem`.
///
/// `None` bound slices are passed as null so cuOpt applies its defaults.
pub struct RangedProblem<'a> {
    pub sense: Sense,
    pub objective_offset: f64,
    pub objective_coefficients: &'a [f64],
    pub row_offsets: &'a [i32],
    pub column_indices: &'a [i32],
    pub values: &'a [f64],
    pub constraint_lower_bounds: Option<&'a [f64]>,
    pub constraint_upper_bounds: Option<&'a [f64]>,
    pub variable_lower_bounds: Option<&'a [f64]>,
    pub variable_upper_bounds: Option<&'a [f64]>,
    pub variable_types: &'a [VarType],
}

impl RangedProblem<'_> {
    pub fn num_constraints(&self) -> usize {
        self.row_offsets.len().saturating_sub(1)
    }

    pub fn num_variables(&self) -> usize {
        self.objective_coefficients.len()
    }

    /// Whether every slice has the length cuOpt will read from it
    pub fn is_consistent(&self) -> bool {
        let m = self.num_constraints();
        let n = self.num_variables();
        let nnz = self.values.len();
        let fits = |bounds: Option<&[f64]>, len: usize| bounds.map_or(true, |b| b.len() == len);

        !self.row_offsets.is_empty()
            && self.row_offsets[0] == 0
            && self.row_offsets.windows(2).all(|w| w[0] <= w[1])
            && self.row_offsets[m] as usize == nnz
            && self.column_indices.len() == nnz
            && self
                .column_indices
                .iter()
                .all(|&col| col >= 0 && (col as usize) < n)
            && fits(self.constraint_lower_bounds, m)
            && fits(self.constraint_upper_bounds, m)
            && fits(self.variable_lower_bounds, n)
            && fits(self.variable_upper_bounds, n)
            && self.variable_types.len() == n
    }
}

fn opt_ptr(values: Option<&[f64]>) -> *const cuopt_float_t {
    values.map_or(ptr::null(), |v| v.as_ptr())
}

/// An optimization problem owned by cuOpt
pub struct Problem {
    ptr: cuOptOptimizationProblem,
    num_variables: usize,
}

impl Problem {
    /// Create a problem in ranged form (`lower <= Ax <= upper`)
    ///
    /// Slices whose lengths disagree with the CSR shape are rejected before
    /// any pointer reaches cuOpt.
    pub fn ranged(data: &RangedProblem<'_>) -> Result<Self, CuoptError> {
        if !data.is_consistent() {
            return Err(CuoptError::invalid("cuOptCreateRangedProblem"));
        }
        let num_constraints = data.num_constraints() as cuopt_int_t;
        let num_variables = data.num_variables() as cuopt_int_t;
        let types: Vec<c_char> = data.variable_types.iter().map(|t| t.raw()).collect();

        let mut raw: cuOptOptimizationProblem = ptr::null_mut();
        let status = unsafe {
            cuOptCreateRangedProblem(
                num_constraints,
                num_variables,
                data.sense.raw(),
                data.objective_offset,
                data.objective_coefficients.as_ptr(),
                data.row_offsets.as_ptr(),
                data.column_indices.as_ptr(),
                data.values.as_ptr(),
                opt_ptr(data.constraint_lower_bounds),
                opt_ptr(data.constraint_upper_bounds),
                opt_ptr(data.variable_lower_bounds),
                opt_ptr(data.variable_upper_bounds),
                types.as_ptr(),
                &mut raw,
            )
        };
        // Wrap first so a partially created problem is still released
        let problem = Problem {
            ptr: raw,
            num_variables: data.num_variables(),
        };
        check("cuOptCreateRangedProblem", status)?;
        Ok(problem)
    }

    /// Whether cuOpt classifies the problem as a MIP
    pub fn is_mip(&self) -> Result<bool, CuoptError> {
        let mut is_mip: cuopt_int_t = 0;
        check("cuOptIsMIP", unsafe { cuOptIsMIP(self.ptr, &mut is_mip) })?;
        Ok(is_mip != 0)
    }

    /// Solve the problem with the given settings
    pub fn solve(&self, settings: &SolverSettings) -> Result<Solution, CuoptError> {
        let mut raw: cuOptSolution = ptr::null_mut();
        let status = unsafe { cuOptSolve(self.ptr, settings.ptr, &mut raw) };
        let solution = Solution {
            ptr: raw,
            num_variables: self.num_variables,
        };
        check("cuOptSolve", status)?;
        Ok(solution)
    }
}

impl Drop for Problem {
    fn drop(&mut self) {
        // cuOptDestroyProblem is a no-op on null and resets the pointer
        unsafe { cuOptDestroyProblem(&mut self.ptr) }
    }
}

/// Solver configuration owned by cuOpt
pub struct SolverSettings {
    ptr: cuOptSolverSettings,
}

impl SolverSettings {
    pub fn new() -> Result<Self, CuoptError> {
        let mut raw: cuOptSolverSettings = ptr::null_mut();
        let status = unsafe { cuOptCreateSolverSettings(&mut raw) };
        let settings = SolverSettings { ptr: raw };
        check("cuOptCreateSolverSettings", status)?;
        Ok(settings)
    }

    /// Set a floating point parameter such as `time_limit`
    pub fn set_float(&mut self, name: &str, value: f64) -> Result<(), CuoptError> {
        let name = c_string("cuOptSetFloatParameter", name)?;
        check("cuOptSetFloatParameter", unsafe {
            cuOptSetFloatParameter(self.ptr, name.as_ptr(), value)
        })
    }

    /// Set a parameter from its string form such as `user_problem_file`
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), CuoptError> {
        let name = c_string("cuOptSetParameter", name)?;
        let value = c_string("cuOptSetParameter", value)?;
        check("cuOptSetParameter", unsafe {
            cuOptSetParameter(self.ptr, name.as_ptr(), value.as_ptr())
        })
    }
}

impl Drop for SolverSettings {
    fn drop(&mut self) {
        unsafe { cuOptDestroySolverSettings(&mut self.ptr) }
    }
}

/// Result of a solve, owned by cuOpt
pub struct Solution {
    ptr: cuOptSolution,
    /// Column count of the problem this solution belongs to
    num_variables: usize,
}

impl Solution {
    pub fn termination_status(&self) -> Result<i32, CuoptError> {
        let mut status: cuopt_int_t = 0;
        check("cuOptGetTerminationStatus", unsafe {
            cuOptGetTerminationStatus(self.ptr, &mut status)
        })?;
        Ok(status as i32)
    }

    pub fn objective_value(&self) -> Result<f64, CuoptError> {
        let mut value: cuopt_float_t = 0.0;
        check("cuOptGetObjectiveValue", unsafe {
            cuOptGetObjectiveValue(self.ptr, &mut value)
        })?;
        Ok(value)
    }

    /// Solve time in seconds as measured by cuOpt
    pub fn solve_time(&self) -> Result<f64, CuoptError> {
        let mut value: cuopt_float_t = 0.0;
        check("cuOptGetSolveTime", unsafe {
            cuOptGetSolveTime(self.ptr, &mut value)
        })?;
        Ok(value)
    }

    /// One primal value per column of the solved problem
    pub fn primal_solution(&self) -> Result<Vec<f64>, CuoptError> {
        let mut values = vec![0.0; self.num_variables];
        check("cuOptGetPrimalSolution", unsafe {
            cuOptGetPrimalSolution(self.ptr, values.as_mut_ptr())
        })?;
        Ok(values)
    }

    pub fn mip_gap(&self) -> Result<f64, CuoptError> {
        let mut value: cuopt_float_t = 0.0;
        check("cuOptGetMIPGap", unsafe { cuOptGetMIPGap(self.ptr, &mut value) })?;
        Ok(value)
    }

    pub fn solution_bound(&self) -> Result<f64, CuoptError> {
        let mut value: cuopt_float_t = 0.0;
        check("cuOptGetSolutionBound", unsafe {
            cuOptGetSolutionBound(self.ptr, &mut value)
        })?;
        Ok(value)
    }
}

impl Drop for Solution {
    fn drop(&mut self) {
        unsafe { cuOptDestroySolution(&mut self.ptr) }
    }
}
