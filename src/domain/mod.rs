pub mod builder;
pub mod engine;
pub mod engine_factory;
pub mod engines;
pub mod session;
pub mod solve;
pub mod validate;
