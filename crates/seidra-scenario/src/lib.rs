//! Seidra — scenario records.
//!
//! Responsible for story outlines: ordered acts, each holding ordered scenes
//! that reference characters by identifier.

pub mod application;
pub mod domain;
