//! Tournament, its format and lifecycle status, the draw it owns, and engine errors.

use crate::models::game::{BracketNode, Fixture, MatchId};
use crate::models::participant::{Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Fewer than 2 participants, duplicate participant, or malformed roster input.
    InvalidRoster(String),
    /// The draw already exists; rebuilding would discard recorded results.
    AlreadyBuilt,
    /// No draw has been built yet.
    NotBuilt,
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    /// At least one side is a bye or still awaits an earlier winner.
    NotReady(MatchId),
    /// Results are immutable once recorded.
    AlreadyRecorded(MatchId),
    /// Negative, oversized or tied scores.
    InvalidScore { first: i64, second: i64 },
    InvalidStateTransition {
        from: TournamentStatus,
        to: TournamentStatus,
    },
    /// No further results are accepted once the tournament is completed.
    TournamentCompleted,
    /// Operation only applies to tournaments of the other format.
    FormatMismatch { expected: Format },
    /// The tournament changed since the caller read it. Retry with a fresh version.
    Conflict { expected: u64, actual: u64 },
}

impl TournamentError {
    /// Whether the caller may retry the same command after re-reading state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TournamentError::Conflict { .. })
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidRoster(reason) => write!(f, "Invalid roster: {}", reason),
            TournamentError::AlreadyBuilt => write!(f, "The draw has already been built"),
            TournamentError::NotBuilt => write!(f, "The draw has not been built yet"),
            TournamentError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::NotReady(id) => {
                write!(f, "Match {} is not ready: both sides must be known players", id)
            }
            TournamentError::AlreadyRecorded(id) => {
                write!(f, "A result for match {} has already been recorded", id)
            }
            TournamentError::InvalidScore { first, second } => write!(
                f,
                "Invalid score {}-{}: scores must be between 0 and {} and not tied",
                first,
                second,
                crate::logic::MAX_SCORE
            ),
            TournamentError::InvalidStateTransition { from, to } => {
                write!(f, "Cannot move tournament from {} to {}", from, to)
            }
            TournamentError::TournamentCompleted => write!(f, "Tournament is already completed"),
            TournamentError::FormatMismatch { expected } => {
                write!(f, "Only available for {} tournaments", expected)
            }
            TournamentError::Conflict { expected, actual } => write!(
                f,
                "Tournament changed concurrently (expected version {}, found {}); retry",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How the tournament is played.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Single elimination.
    #[default]
    Knockout,
    /// Everyone plays everyone once.
    RoundRobin,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Knockout => write!(f, "knockout"),
            Format::RoundRobin => write!(f, "round robin"),
        }
    }
}

/// Lifecycle status. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    InProgress,
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Upcoming => write!(f, "upcoming"),
            TournamentStatus::InProgress => write!(f, "in progress"),
            TournamentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// The matches a tournament owns, shaped by its format.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "format", content = "matches")]
pub enum Draw {
    /// Flat arena ordered by (round, position).
    Knockout(Vec<BracketNode>),
    RoundRobin(Vec<Fixture>),
}

impl Draw {
    /// Whether any match has a human-entered result (walkovers do not count).
    pub fn has_results(&self) -> bool {
        match self {
            Draw::Knockout(nodes) => nodes.iter().any(|n| n.score.is_some()),
            Draw::RoundRobin(fixtures) => fixtures.iter().any(|f| f.score.is_some()),
        }
    }

    /// Ids of matches with both sides known and no result yet.
    pub fn ready_matches(&self) -> Vec<MatchId> {
        match self {
            Draw::Knockout(nodes) => nodes.iter().filter(|n| n.is_ready()).map(|n| n.id).collect(),
            Draw::RoundRobin(fixtures) => fixtures
                .iter()
                .filter(|f| !f.is_resolved())
                .map(|f| f.id)
                .collect(),
        }
    }
}

/// Full tournament state: roster, format, status, and the draw once built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: Format,
    pub status: TournamentStatus,
    /// Participants in enrollment order.
    pub participants: Vec<Participant>,
    /// None until the bracket or fixture list is built.
    pub draw: Option<Draw>,
    /// Bumped on every successful mutation; used for optimistic concurrency.
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Upcoming state with no draw.
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            status: TournamentStatus::Upcoming,
            participants: Vec::new(),
            draw: None,
            version: 0,
            created_at: Utc::now(),
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Display name for a participant, falling back to the id for unknown entries.
    pub fn display_name(&self, id: ParticipantId) -> String {
        self.participant(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Index in the enrollment order (used as the last tie-break).
    pub fn enrollment_index(&self, id: ParticipantId) -> usize {
        self.participants
            .iter()
            .position(|p| p.id == id)
            .unwrap_or(usize::MAX)
    }

    pub fn draw(&self) -> Result<&Draw, TournamentError> {
        self.draw.as_ref().ok_or(TournamentError::NotBuilt)
    }

    pub fn is_built(&self) -> bool {
        self.draw.is_some()
    }

    pub(crate) fn touch(&mut self) {
        self.version += 1;
    }
}
