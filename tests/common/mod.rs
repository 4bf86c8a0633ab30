#![allow(dead_code)]

use std::cell::RefCell;

use cuopt_json::models::{Termination, TerminationStatus};
use cuopt_json::{Engine, EngineError, Parameter, ProblemModel};

/// Engine call that should return an error instead of succeeding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    CreateProblem,
    CreateSettings,
    SetParameter(&'static str),
    Solve,
    Termination,
    ObjectiveValue,
    SolveTime,
    PrimalSolution,
    IsMip,
    MipGap,
    SolutionBound,
}

pub const FAILURE_STATUS: i32 = 7;

pub struct MockProblem {
    is_mip: bool,
    num_variables: usize,
}

pub struct MockSettings;

pub struct MockSolution {
    values: Vec<f64>,
}

/// In-memory engine that records every call it receives
#[derive(Default)]
pub struct RecordingEngine {
    failures: Vec<FailAt>,
    calls: RefCell<Vec<String>>,
    received: RefCell<Option<ProblemModel>>,
    applied: RefCell<Vec<Parameter>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(failure: FailAt) -> Self {
        RecordingEngine {
            failures: vec![failure],
            ..Self::default()
        }
    }

    pub fn failing_at_all(failures: &[FailAt]) -> Self {
        RecordingEngine {
            failures: failures.to_vec(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    /// The model exactly as it was submitted to `create_ranged_problem`
    pub fn received(&self) -> Option<ProblemModel> {
        self.received.borrow().clone()
    }

    pub fn applied(&self) -> Vec<Parameter> {
        self.applied.borrow().clone()
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    fn check(&self, failure: FailAt, operation: &'static str) -> Result<(), EngineError> {
        if self.failures.contains(&failure) {
            Err(EngineError::new(operation, FAILURE_STATUS))
        } else {
            Ok(())
        }
    }
}

impl Engine for RecordingEngine {
    type Problem = MockProblem;
    type Settings = MockSettings;
    type Solution = MockSolution;

    fn name(&self) -> &str {
        "recording"
    }

    fn create_ranged_problem(&self, model: &ProblemModel) -> Result<MockProblem, EngineError> {
        self.record("create_problem");
        *self.received.borrow_mut() = Some(model.clone());
        self.check(FailAt::CreateProblem, "create_problem")?;
        Ok(MockProblem {
            is_mip: model.has_integer_variables(),
            num_variables: model.num_variables(),
        })
    }

    fn create_settings(&self) -> Result<MockSettings, EngineError> {
        self.record("create_settings");
        self.check(FailAt::CreateSettings, "create_settings")?;
        Ok(MockSettings)
    }

    fn set_parameter(
        &self,
        _settings: &mut MockSettings,
        parameter: &Parameter,
    ) -> Result<(), EngineError> {
        self.record("set_parameter");
        self.check(FailAt::SetParameter(parameter.describe()), "set_parameter")?;
        self.applied.borrow_mut().push(parameter.clone());
        Ok(())
    }

    fn solve(&self, problem: &MockProblem, _settings: &MockSettings) -> Result<MockSolution, EngineError> {
        self.record("solve");
        self.check(FailAt::Solve, "solve")?;
        Ok(MockSolution {
            values: (0..problem.num_variables).map(|i| i as f64).collect(),
        })
    }

    fn termination(&self, _solution: &MockSolution) -> Result<Termination, EngineError> {
        self.check(FailAt::Termination, "termination")?;
        Ok(Termination {
            status: TerminationStatus::Optimal,
            code: 1,
        })
    }

    fn objective_value(&self, _solution: &MockSolution) -> Result<f64, EngineError> {
        self.check(FailAt::ObjectiveValue, "objective_value")?;
        Ok(42.0)
    }

    fn solve_time(&self, _solution: &MockSolution) -> Result<f64, EngineError> {
        self.check(FailAt::SolveTime, "solve_time")?;
        Ok(0.5)
    }

    fn primal_solution(
        &self,
        solution: &MockSolution,
        num_variables: usize,
    ) -> Result<Vec<f64>, EngineError> {
        self.check(FailAt::PrimalSolution, "primal_solution")?;
        let mut values = solution.values.clone();
        values.truncate(num_variables);
        Ok(values)
    }

    fn is_mip(&self, problem: &MockProblem) -> Result<bool, EngineError> {
        self.check(FailAt::IsMip, "is_mip")?;
        Ok(problem.is_mip)
    }

    fn mip_gap(&self, _solution: &MockSolution) -> Result<f64, EngineError> {
        self.check(FailAt::MipGap, "mip_gap")?;
        Ok(0.01)
    }

    fn solution_bound(&self, _solution: &MockSolution) -> Result<f64, EngineError> {
        self.check(FailAt::SolutionBound, "solution_bound")?;
        Ok(41.5)
    }

    fn destroy_problem(&self, _problem: MockProblem) {
        self.record("destroy_problem");
    }

    fn destroy_settings(&self, _settings: MockSettings) {
        self.record("destroy_settings");
    }

    fn destroy_solution(&self, _solution: MockSolution) {
        self.record("destroy_solution");
    }
}
