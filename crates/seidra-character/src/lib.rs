//! Seidra — character records.
//!
//! Responsible for character sheets: profile, traits, narrative history and
//! current state, stored as versioned snapshots.

pub mod application;
pub mod domain;
