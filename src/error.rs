use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::engine::EngineError;

/// Result type for loading, building and solving a problem
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that prevent a usable solve result
#[derive(Error, Debug)]
pub enum Error {
    /// The problem file could not be opened or read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required container or array is missing
    #[error("missing required field `{0}`")]
    MissingField(String),

    /// A field is present but has the wrong shape
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    /// Memory for a model array could not be reserved
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// The JSON report could not be serialized
    #[error("failed to write JSON report: {0}")]
    Report(#[source] serde_json::Error),

    /// An engine call failed during create, configure or solve
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The binary was built without any engine backend
    #[error("no engine backend available; rebuild with `--features cuopt-solver` or `--features highs-solver`")]
    NoEngine,

    /// The requested engine name is not compiled in
    #[error("unknown engine `{0}`")]
    UnknownEngine(String),
}

impl Error {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Error::MissingField(field.into())
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Reserve an empty vector for exactly `len` elements
pub(crate) fn alloc_vec<T>(what: &'static str, len: usize) -> Result<Vec<T>> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|source| Error::Allocation { what, source })?;
    Ok(values)
}
