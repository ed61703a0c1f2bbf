//! Application layer for the scenario context.

pub mod command_handlers;
pub mod query_handlers;
