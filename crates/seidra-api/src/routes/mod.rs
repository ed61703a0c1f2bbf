//! Route modules organized by record kind.

pub mod character;
pub mod health;
pub mod model;
pub mod prompt;
pub mod render;
pub mod scenario;
