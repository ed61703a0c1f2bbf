//! Domain layer for the character context.

pub mod aggregates;
pub mod commands;
