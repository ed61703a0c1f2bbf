//! Seidra — prompt library.
//!
//! Stores named prompt templates as an ordered list of immutable versions,
//! together with a log of which version was used where.

pub mod application;
pub mod domain;
