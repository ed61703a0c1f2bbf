//! Seidra — render jobs.
//!
//! Tracks one request to produce a media asset from a scene, a prompt and a
//! generation config, from dispatch to completion.

pub mod application;
pub mod domain;
