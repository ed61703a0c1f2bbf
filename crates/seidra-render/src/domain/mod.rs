//! Domain layer for render jobs.

pub mod aggregates;
pub mod commands;
