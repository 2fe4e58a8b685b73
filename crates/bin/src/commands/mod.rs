//! Subcommand implementations.

pub mod check;
pub mod edit;
pub mod escadras;
pub mod tree;
