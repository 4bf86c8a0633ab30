use serde::Serialize;
use std::fmt;

// ---------- Canonical problem model ----------

/// Constraint matrix in compressed sparse row form
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    pub row_offsets: Vec<i32>,
    pub column_indices: Vec<i32>,
    pub values: Vec<f64>,
}

impl CsrMatrix {
    /// Number of rows, derived from the offsets array
    pub fn num_rows(&self) -> usize {
        self.row_offsets.len().saturating_sub(1)
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.column_indices.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

impl Default for ObjectiveSense {
    fn default() -> Self {
        ObjectiveSense::Minimize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub coefficients: Vec<f64>,
    pub offset: f64,
    pub sense: ObjectiveSense,
}

/// Paired lower/upper bounds, one entry per row or column.
/// Infinite entries encode one-sided or free bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Bounds {
    /// Bounds with every entry unconstrained
    pub fn free(len: usize) -> Self {
        Bounds {
            lower: vec![f64::NEG_INFINITY; len],
            upper: vec![f64::INFINITY; len],
        }
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    Continuous,
    Integer,
}

/// Problem data ready to hand to an engine.
///
/// Dimensions are derived from the arrays and never stored separately.
/// `None` bounds mean the document declared none; the engine default applies.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemModel {
    pub matrix: CsrMatrix,
    pub objective: Objective,
    pub constraint_bounds: Option<Bounds>,
    pub variable_bounds: Option<Bounds>,
    pub variable_types: Vec<VariableType>,
}

impl ProblemModel {
    pub fn num_constraints(&self) -> usize {
        self.matrix.num_rows()
    }

    pub fn num_variables(&self) -> usize {
        self.objective.coefficients.len()
    }

    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// A model with at least one integer variable
    pub fn has_integer_variables(&self) -> bool {
        self.variable_types
            .iter()
            .any(|t| *t == VariableType::Integer)
    }

    /// Whether every array has the length an engine will read from it
    pub fn is_consistent(&self) -> bool {
        let m = self.num_constraints();
        let n = self.num_variables();
        let offsets = &self.matrix.row_offsets;
        let fits = |bounds: &Option<Bounds>, len: usize| {
            bounds
                .as_ref()
                .map_or(true, |b| b.lower.len() == len && b.upper.len() == len)
        };

        offsets.first() == Some(&0)
            && offsets.windows(2).all(|w| w[0] <= w[1])
            && offsets[m] as usize == self.nnz()
            && self.matrix.column_indices.len() == self.nnz()
            && self
                .matrix
                .column_indices
                .iter()
                .all(|&col| col >= 0 && (col as usize) < n)
            && fits(&self.constraint_bounds, m)
            && fits(&self.variable_bounds, n)
            && self.variable_types.len() == n
    }
}

// ---------- Engine outcome types ----------

/// Why the engine stopped, independent of the backend's numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminationStatus {
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
    TimeLimit,
    NumericalError,
    PrimalFeasible,
    FeasibleFound,
    Unknown,
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationStatus::Optimal => write!(f, "Optimal"),
            TerminationStatus::Infeasible => write!(f, "Infeasible"),
            TerminationStatus::Unbounded => write!(f, "Unbounded"),
            TerminationStatus::IterationLimit => write!(f, "Iteration limit"),
            TerminationStatus::TimeLimit => write!(f, "Time limit"),
            TerminationStatus::NumericalError => write!(f, "Numerical error"),
            TerminationStatus::PrimalFeasible => write!(f, "Primal feasible"),
            TerminationStatus::FeasibleFound => write!(f, "Feasible found"),
            TerminationStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Termination status together with the engine's raw code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Termination {
    pub status: TerminationStatus,
    pub code: i32,
}
