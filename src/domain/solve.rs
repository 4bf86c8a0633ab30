use thiserror::Error;

use crate::config::SolveConfig;
use crate::domain::engine::{Engine, EngineError};
use crate::domain::session::SolveSession;
use crate::models::{ProblemModel, Termination};

/// A result field the engine could not report after a successful solve
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not read {field}: {source}")]
pub struct PartialExtractionError {
    pub field: &'static str,
    #[source]
    pub source: EngineError,
}

impl PartialExtractionError {
    pub fn new(field: &'static str, source: EngineError) -> Self {
        PartialExtractionError { field, source }
    }
}

pub type Extracted<T> = Result<T, PartialExtractionError>;

/// MIP-only metrics
#[derive(Debug, Clone, PartialEq)]
pub struct MipResults {
    pub gap: Extracted<f64>,
    pub solution_bound: Extracted<f64>,
}

/// Everything read back from the engine after a solve
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResults {
    pub termination: Extracted<Termination>,
    pub objective_value: Extracted<f64>,
    pub solve_time: Extracted<f64>,
    pub primal_solution: Extracted<Vec<f64>>,
    /// `Ok(None)` for a pure LP
    pub mip: Extracted<Option<MipResults>>,
}

impl SolveResults {
    /// Every field that could not be read, in report order
    pub fn partial_errors(&self) -> Vec<&PartialExtractionError> {
        let mut errors = Vec::new();
        errors.extend(self.termination.as_ref().err());
        errors.extend(self.solve_time.as_ref().err());
        errors.extend(self.objective_value.as_ref().err());
        errors.extend(self.primal_solution.as_ref().err());
        match &self.mip {
            Ok(Some(mip)) => {
                errors.extend(mip.gap.as_ref().err());
                errors.extend(mip.solution_bound.as_ref().err());
            }
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
        errors
    }
}

/// Drive `engine` through create, configure, solve and extract.
///
/// An engine failure in the first three steps aborts the run with
/// `Err`; extraction failures are reported per field. Handles are released
/// when the session goes out of scope, whichever way this returns.
pub fn solve<E: Engine>(
    engine: &E,
    model: &ProblemModel,
    config: &SolveConfig,
) -> Result<SolveResults, EngineError> {
    let timing = config.timing();
    let _total = timing.phase("SOLVE_TOTAL");

    log::info!("Creating and solving problem with {}...", engine.name());
    log::info!(
        "Problem size: {} constraints, {} variables, {} nonzeros",
        model.num_constraints(),
        model.num_variables(),
        model.nnz()
    );

    let mut session = SolveSession::new(engine, timing);
    session.create_problem(model)?;
    session.configure(config)?;
    session.solve()?;
    session.extract(model.num_variables())
}
