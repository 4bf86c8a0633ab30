//! Load cuOpt JSON optimization problems and solve them through a native
//! engine backend.

pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod models;
pub mod report;
pub mod timing;

pub use config::SolveConfig;
pub use domain::builder::{build_problem_model, read_document};
pub use domain::engine::{Engine, EngineError, Parameter};
pub use domain::engine_factory::{default_engine, solve_with, EngineType};
pub use domain::session::{SessionState, SolveSession};
pub use domain::solve::{solve, MipResults, PartialExtractionError, SolveResults};
pub use error::{Error, Result};
pub use models::ProblemModel;
