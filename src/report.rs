use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::domain::solve::{Extracted, SolveResults};
use crate::models::Termination;

/// Primal values listed in the text report
pub const MAX_LISTED_VARIABLES: usize = 20;

/// Human-readable report, as printed after a successful solve
pub fn render_text(results: &SolveResults, num_variables: usize) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_text(&mut out, results, num_variables);
    out
}

fn write_text(out: &mut String, results: &SolveResults, num_variables: usize) -> std::fmt::Result {
    writeln!(out, "Results:")?;
    writeln!(out, "--------")?;
    match &results.termination {
        Ok(t) => writeln!(out, "Termination status: {} ({})", t.status, t.code)?,
        Err(err) => writeln!(out, "Termination status: unavailable ({})", err)?,
    }
    match &results.solve_time {
        Ok(secs) => writeln!(out, "Solve time: {:.6} seconds", secs)?,
        Err(err) => writeln!(out, "Solve time: unavailable ({})", err)?,
    }
    match &results.objective_value {
        Ok(value) => writeln!(out, "Objective value: {:.6}", value)?,
        Err(err) => writeln!(out, "Objective value: unavailable ({})", err)?,
    }

    match &results.primal_solution {
        Ok(values) if !values.is_empty() => {
            let shown = values.len().min(MAX_LISTED_VARIABLES);
            writeln!(out)?;
            writeln!(out, "Primal Solution (showing first {} variables):", shown)?;
            for (i, value) in values.iter().take(shown).enumerate() {
                writeln!(out, "x{} = {:.6}", i, value)?;
            }
            if num_variables > MAX_LISTED_VARIABLES {
                writeln!(
                    out,
                    "... (showing only first {} of {} variables)",
                    MAX_LISTED_VARIABLES, num_variables
                )?;
            }
        }
        Ok(_) => {}
        Err(err) => writeln!(out, "Primal solution: unavailable ({})", err)?,
    }

    match &results.mip {
        Ok(Some(mip)) => {
            writeln!(out)?;
            match &mip.gap {
                Ok(gap) => writeln!(out, "MIP Gap: {:.6}", gap)?,
                Err(err) => writeln!(out, "MIP Gap: unavailable ({})", err)?,
            }
            match &mip.solution_bound {
                Ok(bound) => writeln!(out, "Solution Bound: {:.6}", bound)?,
                Err(err) => writeln!(out, "Solution Bound: unavailable ({})", err)?,
            }
        }
        Ok(None) => {}
        Err(err) => writeln!(out, "MIP metrics: unavailable ({})", err)?,
    }
    Ok(())
}

/// Machine-readable report; unavailable fields are `null` and explained
/// under `errors`
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub termination: Option<Termination>,
    pub solve_time: Option<f64>,
    pub objective_value: Option<f64>,
    pub num_variables: usize,
    pub primal_solution: Option<&'a [f64]>,
    /// `null` when the engine could not classify the problem
    pub is_mip: Option<bool>,
    pub mip_gap: Option<f64>,
    pub solution_bound: Option<f64>,
    pub errors: BTreeMap<&'static str, String>,
}

pub fn render_json(results: &SolveResults, num_variables: usize) -> JsonReport<'_> {
    let errors = results
        .partial_errors()
        .into_iter()
        .map(|err| (err.field, err.to_string()))
        .collect();

    let (is_mip, mip_gap, solution_bound) = match &results.mip {
        Ok(Some(mip)) => (Some(true), ok(&mip.gap), ok(&mip.solution_bound)),
        Ok(None) => (Some(false), None, None),
        Err(_) => (None, None, None),
    };

    JsonReport {
        termination: results.termination.as_ref().ok().copied(),
        solve_time: ok(&results.solve_time),
        objective_value: ok(&results.objective_value),
        num_variables,
        primal_solution: results.primal_solution.as_deref().ok(),
        is_mip,
        mip_gap,
        solution_bound,
        errors,
    }
}

fn ok(value: &Extracted<f64>) -> Option<f64> {
    value.as_ref().ok().copied()
}
