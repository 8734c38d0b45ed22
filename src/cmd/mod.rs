//! CLI command implementations.

pub mod check;

pub use check::cmd_check;
