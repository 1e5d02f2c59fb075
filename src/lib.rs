//! Bag-Pattern (workspace facade crate).
//!
//! The pattern engine lives in dedicated crates under `crates/`; this package
//! re-exports them as `bag_pattern::{core, types}` and hosts the
//! `bag-pattern` command-line tool.

pub use bag_pattern_core as core;
pub use bag_pattern_types as types;

pub mod cli;
pub mod render;
