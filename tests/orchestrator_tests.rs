mod common;

use std::path::PathBuf;

use common::{FailAt, RecordingEngine, FAILURE_STATUS};
use cuopt_json::models::{Bounds, TerminationStatus};
use cuopt_json::timing::Timing;
use cuopt_json::{
    build_problem_model, solve, EngineError, Parameter, ProblemModel, SessionState, SolveConfig,
    SolveSession,
};
use serde_json::{json, Value};

fn lp_document() -> Value {
    json!({
        "csr_constraint_matrix": {
            "offsets": [0, 2, 4],
            "indices": [0, 1, 0, 1],
            "values": [1, 1, 1, -1]
        },
        "objective_data": {
            "coefficients": [1, 1]
        },
        "maximize": false,
        "constraint_bounds": {
            "lower_bounds": [0, 0],
            "upper_bounds": [10, 0]
        }
    })
}

fn lp_model() -> ProblemModel {
    build_problem_model(&lp_document(), Timing::disabled()).unwrap()
}

fn mip_model() -> ProblemModel {
    let mut doc = lp_document();
    doc["variable_types"] = json!(["C", "I"]);
    build_problem_model(&doc, Timing::disabled()).unwrap()
}

fn destroy_calls(engine: &RecordingEngine) -> Vec<String> {
    engine
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("destroy_"))
        .collect()
}

#[test]
fn test_solve_given_successful_run_should_release_every_handle_once_in_order() {
    let engine = RecordingEngine::new();
    let results = solve(&engine, &lp_model(), &SolveConfig::default()).unwrap();

    assert_eq!(
        engine.calls(),
        vec![
            "create_problem",
            "create_settings",
            "set_parameter",
            "set_parameter",
            "solve",
            "destroy_problem",
            "destroy_settings",
            "destroy_solution",
        ]
    );
    assert!(results.partial_errors().is_empty());
    assert_eq!(results.termination.unwrap().status, TerminationStatus::Optimal);
    assert_eq!(results.objective_value, Ok(42.0));
    assert_eq!(results.solve_time, Ok(0.5));
    assert_eq!(results.primal_solution, Ok(vec![0.0, 1.0]));
    assert_eq!(results.mip, Ok(None));
}

#[test]
fn test_solve_given_end_to_end_document_should_submit_exact_model() {
    let engine = RecordingEngine::new();
    solve(&engine, &lp_model(), &SolveConfig::default()).unwrap();

    let received = engine.received().unwrap();
    assert_eq!(received.num_constraints(), 2);
    assert_eq!(received.num_variables(), 2);
    assert_eq!(received.nnz(), 4);
    assert_eq!(received.matrix.row_offsets, vec![0, 2, 4]);
    assert_eq!(received.matrix.column_indices, vec![0, 1, 0, 1]);
    assert_eq!(received.matrix.values, vec![1.0, 1.0, 1.0, -1.0]);
    assert_eq!(
        received.constraint_bounds,
        Some(Bounds {
            lower: vec![0.0, 0.0],
            upper: vec![10.0, 0.0],
        })
    );
    assert_eq!(received.variable_bounds, None);
}

#[test]
fn test_solve_given_create_failure_should_not_touch_other_handles() {
    let engine = RecordingEngine::failing_at(FailAt::CreateProblem);
    let err = solve(&engine, &lp_model(), &SolveConfig::default()).unwrap_err();

    assert_eq!(err, EngineError::new("create_problem", FAILURE_STATUS));
    assert_eq!(engine.calls(), vec!["create_problem"]);
}

#[test]
fn test_solve_given_settings_failure_should_release_problem_only() {
    let engine = RecordingEngine::failing_at(FailAt::CreateSettings);
    let err = solve(&engine, &lp_model(), &SolveConfig::default()).unwrap_err();

    assert_eq!(err.operation, "create_settings");
    assert_eq!(engine.count("solve"), 0);
    assert_eq!(destroy_calls(&engine), vec!["destroy_problem"]);
}

#[test]
fn test_solve_given_solve_failure_should_release_problem_and_settings() {
    let engine = RecordingEngine::failing_at(FailAt::Solve);
    let err = solve(&engine, &lp_model(), &SolveConfig::default()).unwrap_err();

    assert_eq!(err.operation, "solve");
    assert_eq!(
        destroy_calls(&engine),
        vec!["destroy_problem", "destroy_settings"]
    );
}

#[test]
fn test_solve_given_rejected_parameter_should_continue_with_defaults() {
    let engine = RecordingEngine::failing_at(FailAt::SetParameter("time limit"));
    let results = solve(&engine, &lp_model(), &SolveConfig::default()).unwrap();

    assert_eq!(engine.count("solve"), 1);
    assert_eq!(engine.applied(), vec![Parameter::AbsolutePrimalTolerance(1e-6)]);
    assert!(results.partial_errors().is_empty());
    assert_eq!(destroy_calls(&engine).len(), 3);
}

#[test]
fn test_solve_given_mps_output_should_apply_it_after_defaults() {
    let engine = RecordingEngine::new();
    let config = SolveConfig {
        problem_output: Some(PathBuf::from("out.mps")),
        time_limit: 12.0,
        ..SolveConfig::default()
    };
    solve(&engine, &lp_model(), &config).unwrap();

    assert_eq!(
        engine.applied(),
        vec![
            Parameter::AbsolutePrimalTolerance(1e-6),
            Parameter::TimeLimit(12.0),
            Parameter::ProblemOutputFile(PathBuf::from("out.mps")),
        ]
    );
}

#[test]
fn test_solve_given_objective_read_failure_should_keep_other_fields() {
    let engine = RecordingEngine::failing_at(FailAt::ObjectiveValue);
    let results = solve(&engine, &lp_model(), &SolveConfig::default()).unwrap();

    let err = results.objective_value.as_ref().unwrap_err();
    assert_eq!(err.field, "objective value");
    assert_eq!(err.source.operation, "objective_value");
    assert!(results.termination.is_ok());
    assert!(results.solve_time.is_ok());
    assert!(results.primal_solution.is_ok());
    assert_eq!(results.partial_errors().len(), 1);
    assert_eq!(destroy_calls(&engine).len(), 3);
}

#[test]
fn test_solve_given_every_read_failing_should_still_succeed_and_release() {
    let engine = RecordingEngine::failing_at_all(&[
        FailAt::Termination,
        FailAt::ObjectiveValue,
        FailAt::SolveTime,
        FailAt::PrimalSolution,
        FailAt::IsMip,
    ]);
    let results = solve(&engine, &lp_model(), &SolveConfig::default()).unwrap();

    let fields: Vec<&str> = results.partial_errors().iter().map(|e| e.field).collect();
    assert_eq!(
        fields,
        vec![
            "termination status",
            "solve time",
            "objective value",
            "primal solution",
            "MIP classification",
        ]
    );
    assert_eq!(
        destroy_calls(&engine),
        vec!["destroy_problem", "destroy_settings", "destroy_solution"]
    );
}

#[test]
fn test_solve_given_mip_should_report_gap_and_bound() {
    let engine = RecordingEngine::new();
    let results = solve(&engine, &mip_model(), &SolveConfig::default()).unwrap();

    let mip = results.mip.unwrap().unwrap();
    assert_eq!(mip.gap, Ok(0.01));
    assert_eq!(mip.solution_bound, Ok(41.5));
}

#[test]
fn test_solve_given_mip_gap_failure_should_still_report_bound() {
    let engine = RecordingEngine::failing_at(FailAt::MipGap);
    let results = solve(&engine, &mip_model(), &SolveConfig::default()).unwrap();

    let mip = results.mip.unwrap().unwrap();
    assert_eq!(mip.gap.unwrap_err().field, "MIP gap");
    assert_eq!(mip.solution_bound, Ok(41.5));
}

#[test]
fn test_session_given_lifecycle_should_track_state() {
    let engine = RecordingEngine::new();
    let model = lp_model();
    {
        let mut session = SolveSession::new(&engine, Timing::disabled());
        assert_eq!(session.state(), SessionState::Uninitialized);
        session.create_problem(&model).unwrap();
        assert_eq!(session.state(), SessionState::ProblemCreated);
        session.configure(&SolveConfig::default()).unwrap();
        assert_eq!(session.state(), SessionState::SettingsCreated);
        session.solve().unwrap();
        assert_eq!(session.state(), SessionState::Solved);
        session.extract(model.num_variables()).unwrap();
        assert_eq!(session.state(), SessionState::ResultsExtracted);
        assert!(destroy_calls(&engine).is_empty());
    }
    assert_eq!(destroy_calls(&engine).len(), 3);
}

#[test]
fn test_session_given_solve_before_create_should_fail_without_engine_call() {
    let engine = RecordingEngine::new();
    {
        let mut session = SolveSession::new(&engine, Timing::disabled());
        let err = session.solve().unwrap_err();
        assert_eq!(err.status, EngineError::MISSING_HANDLE);
    }
    assert!(engine.calls().is_empty());
}
