use serde_json::Value;

use crate::domain::validate::optional_array;
use crate::error::{alloc_vec, Result};
use crate::models::Bounds;

// ---------- Scalar conversion ----------

/// Convert one JSON scalar into a float.
///
/// Numbers pass through. The strings `inf`/`infinity` and
/// `-inf`/`-infinity`/`ninf` map to the infinities; any other string is
/// read up to its longest numeric prefix, decimal or hexadecimal integer,
/// so garbage becomes `0.0`.
/// Every other node kind is `0.0`.
pub fn parse_numeric_value(item: &Value) -> f64 {
    match item {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => match s.as_str() {
            "inf" | "infinity" => f64::INFINITY,
            "-inf" | "-infinity" | "ninf" => f64::NEG_INFINITY,
            other => parse_decimal_prefix(other),
        },
        _ => 0.0,
    }
}

/// Longest leading number in `s`, or `0.0` when there is none.
/// Hexadecimal integers (`0x1A`) are read too; hex fractions and `p`
/// exponents are not.
fn parse_decimal_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    if let Ok(value) = s.parse::<f64>() {
        return value;
    }
    if let Some(value) = parse_hex_prefix(s) {
        return value;
    }
    let candidate_len = s
        .bytes()
        .take_while(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        .count();
    (1..=candidate_len)
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn parse_hex_prefix(s: &str) -> Option<f64> {
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let digits = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X"))?;
    let len = digits.bytes().take_while(u8::is_ascii_hexdigit).count();
    if len == 0 {
        return None;
    }
    let value = digits[..len]
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0.0, |acc, d| acc * 16.0 + f64::from(d));
    Some(sign * value)
}

/// Convert one JSON scalar into an engine index, truncating floats.
/// Out of range values saturate; non-numbers are `0`.
pub fn parse_integer_value(item: &Value) -> i32 {
    match item {
        Value::Number(n) => match n.as_i64() {
            Some(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            None => n.as_f64().map_or(0, |v| v as i32),
        },
        _ => 0,
    }
}

// ---------- Bound encodings ----------

/// Row relation in the `bounds`/`types` encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRelation {
    /// `row <= bound`
    LessEqual,
    /// `row >= bound`
    GreaterEqual,
    /// `row == bound`
    Equal,
}

impl RowRelation {
    /// Parse a relation letter (case-sensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(RowRelation::LessEqual),
            "G" => Some(RowRelation::GreaterEqual),
            "E" => Some(RowRelation::Equal),
            _ => None,
        }
    }

    /// Ranged `(lower, upper)` pair for this relation
    pub fn range(self, bound: f64) -> (f64, f64) {
        match self {
            RowRelation::LessEqual => (f64::NEG_INFINITY, bound),
            RowRelation::GreaterEqual => (bound, f64::INFINITY),
            RowRelation::Equal => (bound, bound),
        }
    }
}

/// The ways a document may declare constraint bounds.
///
/// Detected once from the `constraint_bounds` container; the explicit pair
/// wins when both of its arrays are present.
#[derive(Debug, Clone, Copy)]
pub enum ConstraintBoundEncoding<'a> {
    Explicit {
        lower: &'a [Value],
        upper: &'a [Value],
    },
    Relational {
        bounds: &'a [Value],
        types: &'a [Value],
    },
    Undeclared,
}

impl<'a> ConstraintBoundEncoding<'a> {
    pub fn detect(container: Option<&'a Value>) -> Result<Self> {
        let Some(container) = container else {
            return Ok(ConstraintBoundEncoding::Undeclared);
        };

        let lower = optional_array(container, "lower_bounds", "constraint_bounds.lower_bounds")?;
        let upper = optional_array(container, "upper_bounds", "constraint_bounds.upper_bounds")?;
        if let (Some(lower), Some(upper)) = (lower, upper) {
            return Ok(ConstraintBoundEncoding::Explicit { lower, upper });
        }

        let bounds = optional_array(container, "bounds", "constraint_bounds.bounds")?;
        let types = optional_array(container, "types", "constraint_bounds.types")?;
        if let (Some(bounds), Some(types)) = (bounds, types) {
            return Ok(ConstraintBoundEncoding::Relational { bounds, types });
        }

        Ok(ConstraintBoundEncoding::Undeclared)
    }

    /// Ranged bounds for `num_constraints` rows, or `None` when undeclared
    pub fn resolve(self, num_constraints: usize) -> Result<Option<Bounds>> {
        match self {
            ConstraintBoundEncoding::Explicit { lower, upper } => {
                explicit_bounds("constraint_bounds", lower, upper, num_constraints).map(Some)
            }
            ConstraintBoundEncoding::Relational { bounds, types } => {
                relational_bounds(bounds, types, num_constraints).map(Some)
            }
            ConstraintBoundEncoding::Undeclared => Ok(None),
        }
    }
}

/// Explicit `lower_bounds`/`upper_bounds` arrays, parsed pairwise.
///
/// Short arrays are padded with the side's infinity, long ones truncated.
pub fn explicit_bounds(
    what: &'static str,
    lower: &[Value],
    upper: &[Value],
    len: usize,
) -> Result<Bounds> {
    if lower.len() != len || upper.len() != len {
        log::warn!(
            "{} arrays have {} lower and {} upper entries for {} items",
            what,
            lower.len(),
            upper.len(),
            len
        );
    }
    Ok(Bounds {
        lower: parse_side(what, lower, len, f64::NEG_INFINITY)?,
        upper: parse_side(what, upper, len, f64::INFINITY)?,
    })
}

fn parse_side(what: &'static str, items: &[Value], len: usize, fill: f64) -> Result<Vec<f64>> {
    let mut values = alloc_vec(what, len)?;
    values.extend(items.iter().take(len).map(parse_numeric_value));
    values.resize(len, fill);
    Ok(values)
}

/// `bounds`/`types` arrays walked pairwise up to `num_constraints` rows.
/// Rows with an unknown type letter, or past the end of either array, stay
/// unconstrained.
fn relational_bounds(bounds: &[Value], types: &[Value], num_constraints: usize) -> Result<Bounds> {
    let mut lower = alloc_vec("constraint_bounds", num_constraints)?;
    let mut upper = alloc_vec("constraint_bounds", num_constraints)?;
    lower.resize(num_constraints, f64::NEG_INFINITY);
    upper.resize(num_constraints, f64::INFINITY);

    for (row, (bound, kind)) in bounds.iter().zip(types).take(num_constraints).enumerate() {
        let relation = kind.as_str().and_then(RowRelation::from_code);
        match relation {
            Some(relation) => {
                let (lo, hi) = relation.range(parse_numeric_value(bound));
                lower[row] = lo;
                upper[row] = hi;
            }
            None => log::warn!(
                "constraint {} has unrecognized bound type {}, leaving it unconstrained",
                row,
                kind
            ),
        }
    }

    Ok(Bounds { lower, upper })
}
