//! Command implementations for the link-globs CLI

pub mod config;
pub mod expand;
pub mod version;
