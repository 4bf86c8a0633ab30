use crate::config::SolveConfig;
use crate::domain::engine::{Engine, EngineError, Parameter};
use crate::domain::solve::{MipResults, PartialExtractionError, SolveResults};
use crate::models::ProblemModel;
use crate::timing::Timing;

/// Lifecycle position of a [`SolveSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    ProblemCreated,
    SettingsCreated,
    Solved,
    ResultsExtracted,
    Destroyed,
}

/// Owns the engine handles of one solve.
///
/// Dropping the session releases `problem`, `settings` and `solution` in
/// that order, skipping any that were never created. Every exit path,
/// including an early `?`, therefore runs teardown exactly once.
pub struct SolveSession<'e, E: Engine> {
    engine: &'e E,
    timing: Timing,
    problem: Option<E::Problem>,
    settings: Option<E::Settings>,
    solution: Option<E::Solution>,
    state: SessionState,
}

impl<'e, E: Engine> SolveSession<'e, E> {
    pub fn new(engine: &'e E, timing: Timing) -> Self {
        SolveSession {
            engine,
            timing,
            problem: None,
            settings: None,
            solution: None,
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn create_problem(&mut self, model: &ProblemModel) -> Result<(), EngineError> {
        let _t = self.timing.phase("PROBLEM_CREATION");
        let problem = self.engine.create_ranged_problem(model)?;
        self.problem = Some(problem);
        self.state = SessionState::ProblemCreated;
        Ok(())
    }

    /// Create the settings handle and apply every parameter.
    ///
    /// Only a failure to create the handle is fatal; a rejected parameter is
    /// logged and the engine default stays in effect.
    pub fn configure(&mut self, config: &SolveConfig) -> Result<(), EngineError> {
        let _t = self.timing.phase("SOLVER_SETTINGS");
        let settings = self.settings.insert(self.engine.create_settings()?);
        self.state = SessionState::SettingsCreated;

        for parameter in config.engine_parameters() {
            match self.engine.set_parameter(settings, &parameter) {
                Ok(()) => {
                    if let Parameter::ProblemOutputFile(path) = &parameter {
                        log::info!("MPS file will be written to: {}", path.display());
                    }
                }
                Err(err) => log::warn!("Could not set {}: {}", parameter.describe(), err),
            }
        }
        Ok(())
    }

    pub fn solve(&mut self) -> Result<(), EngineError> {
        let _t = self.timing.phase("SOLVER_EXECUTION");
        let problem = require(&self.problem, "solve")?;
        let settings = require(&self.settings, "solve")?;
        let solution = self.engine.solve(problem, settings)?;
        self.solution = Some(solution);
        self.state = SessionState::Solved;
        Ok(())
    }

    /// Read every result field independently.
    ///
    /// A field the engine cannot report becomes a [`PartialExtractionError`]
    /// in the results; it does not stop the remaining reads.
    pub fn extract(&mut self, num_variables: usize) -> Result<SolveResults, EngineError> {
        let _t = self.timing.phase("RESULT_EXTRACTION");
        let problem = require(&self.problem, "extract")?;
        let solution = require(&self.solution, "extract")?;
        let engine = self.engine;

        let mip = match engine.is_mip(problem) {
            Ok(true) => Ok(Some(MipResults {
                gap: field("MIP gap", engine.mip_gap(solution)),
                solution_bound: field("solution bound", engine.solution_bound(solution)),
            })),
            Ok(false) => Ok(None),
            Err(err) => Err(PartialExtractionError::new("MIP classification", err)),
        };

        let results = SolveResults {
            termination: field("termination status", engine.termination(solution)),
            objective_value: field("objective value", engine.objective_value(solution)),
            solve_time: field("solve time", engine.solve_time(solution)),
            primal_solution: field(
                "primal solution",
                engine.primal_solution(solution, num_variables),
            ),
            mip,
        };
        for err in results.partial_errors() {
            log::warn!("{}", err);
        }

        self.state = SessionState::ResultsExtracted;
        Ok(results)
    }

    fn teardown(&mut self) {
        let _t = self.timing.phase("CLEANUP");
        if let Some(problem) = self.problem.take() {
            self.engine.destroy_problem(problem);
        }
        if let Some(settings) = self.settings.take() {
            self.engine.destroy_settings(settings);
        }
        if let Some(solution) = self.solution.take() {
            self.engine.destroy_solution(solution);
        }
        log::debug!("Released {} handles after {:?}", self.engine.name(), self.state);
        self.state = SessionState::Destroyed;
    }
}

impl<E: Engine> Drop for SolveSession<'_, E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn require<'a, T>(slot: &'a Option<T>, operation: &'static str) -> Result<&'a T, EngineError> {
    slot.as_ref()
        .ok_or(EngineError::new(operation, EngineError::MISSING_HANDLE))
}

fn field<T>(
    name: &'static str,
    value: Result<T, EngineError>,
) -> Result<T, PartialExtractionError> {
    value.map_err(|err| PartialExtractionError::new(name, err))
}
