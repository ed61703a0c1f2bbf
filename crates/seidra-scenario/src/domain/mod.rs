//! Domain layer for the scenario context.

pub mod aggregates;
pub mod commands;
