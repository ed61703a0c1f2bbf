//! Commands for the character context.

use uuid::Uuid;

use crate::domain::aggregates::{CharacterState, HistoryEntry, Profile, Traits};

/// Command to create a new character.
#[derive(Debug, Clone)]
pub struct CreateCharacter {
    /// Profile; the name is required.
    pub profile: Profile,
    /// Traits.
    pub traits: Traits,
    /// Initial history.
    pub history: Vec<HistoryEntry>,
    /// Initial state.
    pub state: Option<CharacterState>,
}

/// Command to replace the editable parts of a character.
#[derive(Debug, Clone)]
pub struct UpdateCharacter {
    /// The character identifier.
    pub character_id: Uuid,
    /// New profile.
    pub profile: Profile,
    /// New traits.
    pub traits: Traits,
    /// New history.
    pub history: Vec<HistoryEntry>,
    /// New state.
    pub state: Option<CharacterState>,
}

/// Command to delete a character and its history.
#[derive(Debug, Clone, Copy)]
pub struct DeleteCharacter {
    /// The character identifier.
    pub character_id: Uuid,
}
