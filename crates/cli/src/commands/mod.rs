//! Subcommand implementations.

pub mod api;
pub mod fixtures;
pub mod roles;
