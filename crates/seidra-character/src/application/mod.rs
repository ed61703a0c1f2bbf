//! Application layer for the character context.

pub mod command_handlers;
pub mod query_handlers;
