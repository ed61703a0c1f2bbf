//! Domain layer for the prompt library.

pub mod aggregates;
pub mod commands;
