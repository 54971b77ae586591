//! Command implementations for the kitchain CLI.

pub mod chain;
pub mod inspect;
