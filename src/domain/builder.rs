use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::convert::{explicit_bounds, parse_integer_value, ConstraintBoundEncoding};
use crate::domain::validate::{optional_array, require, require_array};
use crate::error::{alloc_vec, Error, Result};
use crate::models::{Bounds, CsrMatrix, Objective, ObjectiveSense, ProblemModel, VariableType};
use crate::timing::Timing;

/// Read and parse the whole document before any model building starts
pub fn read_document(path: &Path, timing: Timing) -> Result<Value> {
    log::info!("Reading JSON file: {}", path.display());
    let text = {
        let _t = timing.phase("FILE_READ");
        fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?
    };
    let _t = timing.phase("JSON_PARSE");
    Ok(serde_json::from_str(&text)?)
}

/// Build the canonical model from a parsed cuOpt JSON document.
///
/// Only `csr_constraint_matrix` and `objective_data.coefficients` are
/// required; every other section may be absent.
pub fn build_problem_model(doc: &Value, timing: Timing) -> Result<ProblemModel> {
    let matrix = {
        let _t = timing.phase("CSR_MATRIX_PARSE");
        build_matrix(doc)?
    };
    let objective = {
        let _t = timing.phase("OBJECTIVE_PARSE");
        build_objective(doc)?
    };
    let num_constraints = matrix.num_rows();
    let num_variables = objective.coefficients.len();
    check_column_indices(&matrix, num_variables)?;

    let constraint_bounds = {
        let _t = timing.phase("CONSTRAINT_BOUNDS_PARSE");
        build_constraint_bounds(doc, num_constraints)?
    };
    let variable_bounds = {
        let _t = timing.phase("VARIABLE_BOUNDS_PARSE");
        build_variable_bounds(doc, num_variables)?
    };
    let variable_types = {
        let _t = timing.phase("VARIABLE_TYPES_PARSE");
        build_variable_types(doc, num_variables)?
    };

    Ok(ProblemModel {
        matrix,
        objective,
        constraint_bounds,
        variable_bounds,
        variable_types,
    })
}

/// Read `csr_constraint_matrix.{offsets,indices,values}` in document order
pub fn build_matrix(doc: &Value) -> Result<CsrMatrix> {
    let csr = require(doc, "csr_constraint_matrix", "csr_constraint_matrix")?;
    let offsets = require_array(csr, "offsets", "csr_constraint_matrix.offsets")?;
    let indices = require_array(csr, "indices", "csr_constraint_matrix.indices")?;
    let values = require_array(csr, "values", "csr_constraint_matrix.values")?;

    if offsets.is_empty() {
        return Err(Error::invalid(
            "csr_constraint_matrix.offsets",
            "expected at least one entry",
        ));
    }
    if values.len() != indices.len() {
        return Err(Error::invalid(
            "csr_constraint_matrix.values",
            format!(
                "has {} entries but indices has {}",
                values.len(),
                indices.len()
            ),
        ));
    }

    let mut row_offsets = alloc_vec("csr row offsets", offsets.len())?;
    row_offsets.extend(offsets.iter().map(parse_integer_value));

    let mut column_indices = alloc_vec("csr column indices", indices.len())?;
    column_indices.extend(indices.iter().map(parse_integer_value));

    let mut matrix_values = alloc_vec("csr values", values.len())?;
    matrix_values.extend(values.iter().map(|v| v.as_f64().unwrap_or(0.0)));

    check_row_offsets(&row_offsets, column_indices.len())?;

    Ok(CsrMatrix {
        row_offsets,
        column_indices,
        values: matrix_values,
    })
}

/// Offsets must start at 0, never decrease and end at `nnz`
fn check_row_offsets(row_offsets: &[i32], nnz: usize) -> Result<()> {
    let field = "csr_constraint_matrix.offsets";
    if row_offsets.first() != Some(&0) {
        return Err(Error::invalid(field, "first offset must be 0"));
    }
    if let Some(row) = row_offsets.windows(2).position(|w| w[0] > w[1]) {
        return Err(Error::invalid(
            field,
            format!("offsets decrease after row {}", row),
        ));
    }
    let last = row_offsets.last().copied().unwrap_or(0);
    if usize::try_from(last).ok() != Some(nnz) {
        return Err(Error::invalid(
            field,
            format!("last offset is {} but there are {} nonzeros", last, nnz),
        ));
    }
    Ok(())
}

/// Every column index must name one of the `num_variables` objective columns
pub fn check_column_indices(matrix: &CsrMatrix, num_variables: usize) -> Result<()> {
    let out_of_range = matrix
        .column_indices
        .iter()
        .position(|&col| usize::try_from(col).map_or(true, |col| col >= num_variables));
    match out_of_range {
        Some(at) => Err(Error::invalid(
            "csr_constraint_matrix.indices",
            format!(
                "entry {} is column {}, outside 0..{}",
                at, matrix.column_indices[at], num_variables
            ),
        )),
        None => Ok(()),
    }
}

/// Read `objective_data` and the top-level `maximize` flag
pub fn build_objective(doc: &Value) -> Result<Objective> {
    let objective_data = require(doc, "objective_data", "objective_data")?;
    let items = require_array(objective_data, "coefficients", "objective_data.coefficients")?;

    let mut coefficients = alloc_vec("objective coefficients", items.len())?;
    coefficients.extend(items.iter().map(|v| v.as_f64().unwrap_or(0.0)));

    let offset = objective_data
        .get("offset")
        .map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
    log::info!("Objective offset: {}", offset);

    let sense = match doc.get("maximize").and_then(Value::as_bool) {
        Some(true) => ObjectiveSense::Maximize,
        _ => ObjectiveSense::Minimize,
    };

    Ok(Objective {
        coefficients,
        offset,
        sense,
    })
}

/// Reconcile the two constraint bound encodings into ranged bounds
pub fn build_constraint_bounds(doc: &Value, num_constraints: usize) -> Result<Option<Bounds>> {
    ConstraintBoundEncoding::detect(doc.get("constraint_bounds"))?.resolve(num_constraints)
}

/// Read `variable_bounds.{lower_bounds,upper_bounds}`; there is no relational form
pub fn build_variable_bounds(doc: &Value, num_variables: usize) -> Result<Option<Bounds>> {
    let Some(container) = doc.get("variable_bounds") else {
        return Ok(None);
    };
    let lower = optional_array(container, "lower_bounds", "variable_bounds.lower_bounds")?;
    let upper = optional_array(container, "upper_bounds", "variable_bounds.upper_bounds")?;

    match (lower, upper) {
        (Some(lower), Some(upper)) => {
            explicit_bounds("variable_bounds", lower, upper, num_variables).map(Some)
        }
        _ => {
            log::warn!("variable_bounds needs both lower_bounds and upper_bounds, ignoring it");
            Ok(None)
        }
    }
}

/// `"I"` marks an integer variable; anything else, or no array at all, is continuous
pub fn build_variable_types(doc: &Value, num_variables: usize) -> Result<Vec<VariableType>> {
    let mut types = alloc_vec("variable types", num_variables)?;
    if let Some(items) = optional_array(doc, "variable_types", "variable_types")? {
        if items.len() != num_variables {
            log::warn!(
                "variable_types has {} entries for {} variables",
                items.len(),
                num_variables
            );
        }
        types.extend(items.iter().take(num_variables).map(|item| match item.as_str() {
            Some("I") => VariableType::Integer,
            _ => VariableType::Continuous,
        }));
    }
    types.resize(num_variables, VariableType::Continuous);
    Ok(types)
}
