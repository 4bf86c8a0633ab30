#[cfg(feature = "cuopt-solver")]
pub mod cuopt_engine;

#[cfg(feature = "highs-solver")]
pub mod highs_engine;

#[cfg(feature = "cuopt-solver")]
pub use cuopt_engine::CuoptEngine;

#[cfg(feature = "highs-solver")]
pub use highs_engine::HighsEngine;
