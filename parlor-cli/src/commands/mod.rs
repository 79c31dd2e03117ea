//! CLI command implementations.

pub mod join;
pub mod resolve;
