//! Seidra Core — shared domain abstractions.
//!
//! This crate defines the traits and types every record context and the
//! media pipeline depend on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod record;
pub mod repository;
