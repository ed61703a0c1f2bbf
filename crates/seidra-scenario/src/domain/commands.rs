//! Commands for the scenario context.

use uuid::Uuid;

use crate::domain::aggregates::Act;

/// Command to create a new scenario.
#[derive(Debug, Clone)]
pub struct CreateScenario {
    /// Scenario title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Ordered acts.
    pub acts: Vec<Act>,
}

/// Command to replace a scenario's outline.
#[derive(Debug, Clone)]
pub struct UpdateScenario {
    /// The scenario identifier.
    pub scenario_id: Uuid,
    /// New title.
    pub title: String,
    /// New description.
    pub description: Option<String>,
    /// New acts.
    pub acts: Vec<Act>,
}
