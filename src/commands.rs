//! Subcommands of the `jpp` binary.
pub mod generate;
