use crate::config::SolveConfig;
use crate::domain::solve::{solve, SolveResults};
use crate::error::Result;
use crate::models::ProblemModel;

#[cfg(feature = "cuopt-solver")]
use crate::domain::engines::CuoptEngine;

#[cfg(feature = "highs-solver")]
use crate::domain::engines::HighsEngine;

/// Available engine backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineType {
    #[cfg(feature = "cuopt-solver")]
    Cuopt,
    #[cfg(feature = "highs-solver")]
    Highs,
}

impl EngineType {
    /// Parse engine type from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            #[cfg(feature = "cuopt-solver")]
            "cuopt" => Some(EngineType::Cuopt),
            #[cfg(feature = "highs-solver")]
            "highs" => Some(EngineType::Highs),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            #[cfg(feature = "cuopt-solver")]
            EngineType::Cuopt => "cuOpt",
            #[cfg(feature = "highs-solver")]
            EngineType::Highs => "HiGHS",
        }
    }
}

/// First compiled-in backend, cuOpt before HiGHS
#[allow(unreachable_code)]
pub fn default_engine() -> Option<EngineType> {
    #[cfg(feature = "cuopt-solver")]
    return Some(EngineType::Cuopt);
    #[cfg(feature = "highs-solver")]
    return Some(EngineType::Highs);
    None
}

/// Run the solve lifecycle on the backend named by `engine_type`
#[allow(unused_variables)]
pub fn solve_with(
    engine_type: EngineType,
    model: &ProblemModel,
    config: &SolveConfig,
) -> Result<SolveResults> {
    match engine_type {
        #[cfg(feature = "cuopt-solver")]
        EngineType::Cuopt => Ok(solve(&CuoptEngine::new(), model, config)?),
        #[cfg(feature = "highs-solver")]
        EngineType::Highs => Ok(solve(&HighsEngine::new(), model, config)?),
    }
}
