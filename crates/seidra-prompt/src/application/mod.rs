//! Application layer for the prompt library.

pub mod command_handlers;
pub mod query_handlers;
