//! Data structures for the tournament engine: participants, matches, tournament state.

mod game;
mod participant;
mod standing;
mod tournament;

pub use game::{BracketNode, Fixture, MatchId, Score, Side, Slot};
pub use participant::{Participant, ParticipantId};
pub use standing::{PointsTable, Standing};
pub use tournament::{Draw, Format, Tournament, TournamentError, TournamentId, TournamentStatus};
