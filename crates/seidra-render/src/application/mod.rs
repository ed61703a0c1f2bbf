//! Application layer for render jobs.

pub mod command_handlers;
pub mod query_handlers;
