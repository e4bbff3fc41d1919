//! Path and pattern helpers shared by the expansion engine

pub mod glob;
pub mod paths;
