use serde_json::{json, Value};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

struct TestFile {
    path: PathBuf,
}

impl TestFile {
    fn write(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("cuopt_json_cli_{}", name));
        fs::write(&path, contents).expect("Failed to write test file");
        TestFile { path }
    }

    fn json(name: &str, doc: &Value) -> Self {
        Self::write(name, &doc.to_string())
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cuopt-json"))
        .args(args)
        .env("RUST_LOG", "info")
        .env_remove("CUOPT_JSON_ENGINE")
        .output()
        .expect("Failed to run cuopt-json")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn lp_document() -> Value {
    // min x + y  s.t.  0 <= x + y <= 10,  x - y = 0,  x, y >= 1
    json!({
        "csr_constraint_matrix": {
            "offsets": [0, 2, 4],
            "indices": [0, 1, 0, 1],
            "values": [1.0, 1.0, 1.0, -1.0]
        },
        "objective_data": {
            "coefficients": [1.0, 1.0],
            "offset": 0.5
        },
        "maximize": false,
        "constraint_bounds": {
            "lower_bounds": [0.0, 0.0],
            "upper_bounds": [10.0, 0.0]
        },
        "variable_bounds": {
            "lower_bounds": [1.0, 1.0],
            "upper_bounds": ["inf", "inf"]
        }
    })
}

#[test]
#[serial]
fn test_cli_given_no_arguments_should_exit_with_failure() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
#[serial]
fn test_cli_given_unknown_option_should_exit_with_failure() {
    let output = run(&["--frobnicate", "problem.json"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
#[serial]
fn test_cli_given_missing_file_should_report_io_error() {
    let output = run(&["/nonexistent/cuopt_problem.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot read /nonexistent/cuopt_problem.json"));
    assert!(output.stdout.is_empty());
}

#[test]
#[serial]
fn test_cli_given_malformed_json_should_report_parse_error() {
    let file = TestFile::write("malformed.json", "{ \"csr_constraint_matrix\": [");
    let output = run(&[file.path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to parse JSON"));
}

#[test]
#[serial]
fn test_cli_given_missing_csr_matrix_should_report_missing_field() {
    let mut doc = lp_document();
    doc.as_object_mut().unwrap().remove("csr_constraint_matrix");
    let file = TestFile::json("missing_csr.json", &doc);

    let output = run(&[file.path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("missing required field `csr_constraint_matrix`"));
}

#[test]
#[serial]
fn test_cli_given_unknown_engine_should_exit_with_failure() {
    let file = TestFile::json("unknown_engine.json", &lp_document());
    let output = run(&["--engine", "glpk", file.path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown engine `glpk`"));
}

#[test]
#[serial]
fn test_cli_given_unknown_engine_and_bad_input_should_report_input_error_first() {
    let mut doc = lp_document();
    doc.as_object_mut().unwrap().remove("objective_data");
    let file = TestFile::json("unknown_engine_bad_input.json", &doc);

    let output = run(&["--engine", "glpk", file.path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("missing required field `objective_data`"));
    assert!(!stderr(&output).contains("unknown engine"));
}

#[test]
#[serial]
fn test_cli_given_overlong_offsets_should_reject_matrix() {
    let mut doc = lp_document();
    doc["csr_constraint_matrix"]["offsets"] = json!([0, 2, 9]);
    let file = TestFile::json("overlong_offsets.json", &doc);

    let output = run(&[file.path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid field `csr_constraint_matrix.offsets`"));
}

#[cfg(not(any(feature = "cuopt-solver", feature = "highs-solver")))]
#[test]
#[serial]
fn test_cli_given_no_engine_compiled_should_exit_with_failure() {
    let file = TestFile::json("no_engine.json", &lp_document());
    let output = run(&[file.path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no engine backend available"));
    assert!(stderr(&output).contains("Objective offset"));
}

#[cfg(feature = "highs-solver")]
#[test]
#[serial]
fn test_cli_given_lp_with_highs_should_print_report() {
    let file = TestFile::json("highs_lp.json", &lp_document());
    let output = run(&["--engine", "highs", file.path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Termination status: Optimal"));
    assert!(stdout.contains("Objective value: 2.500000"));
    assert!(stdout.contains("x0 = 1.000000"));
    assert!(stdout.contains("x1 = 1.000000"));
}

#[cfg(feature = "highs-solver")]
#[test]
#[serial]
fn test_cli_given_json_format_should_print_json_report() {
    let file = TestFile::json("highs_json.json", &lp_document());
    let output = run(&[
        "--engine",
        "highs",
        "--format",
        "json",
        "--timing",
        file.path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["termination"]["status"], "Optimal");
    assert_eq!(report["num_variables"], 2);
    assert_eq!(report["is_mip"], false);
    assert!(stderr(&output).contains("[DURATION] SOLVER_EXECUTION"));
}
