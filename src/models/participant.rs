//! Participant: an enrolled club member taking part in a tournament.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (owned by the club roster, referenced here).
pub type ParticipantId = Uuid;

/// A participant as supplied by the roster. Immutable once the draw is built.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Seed rank, 1 being the top seed. Unseeded participants follow the seeded ones.
    #[serde(default)]
    pub seed: Option<u32>,
}

impl Participant {
    /// Create an unseeded participant with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Create a participant with an id issued by the roster collaborator.
    pub fn with_id(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            seed: None,
        }
    }

    /// Builder-style seed assignment.
    pub fn seeded(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }
}
