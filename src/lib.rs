//! Badminton club tournament engine: knockout brackets with byes, round robin standings,
//! result recording and lifecycle, behind a per-tournament locked store.

pub mod engine;
pub mod logic;
pub mod models;
pub mod roster;
pub mod store;

pub use engine::Engine;
pub use logic::{
    assemble_view, assign_byes, build_draw, build_knockout, build_round_robin, completion_ready,
    compute_standings, generate_round_robin_fixtures, next_power_of_two, pending_matches,
    record_result, seed_order, transition_status, validate_roster, validate_score, DrawView,
    FixtureView, MatchState, NodeView, ParticipantRef, RoundView, SlotView, TournamentView,
    MAX_SCORE,
};
pub use models::{
    BracketNode, Draw, Fixture, Format, MatchId, Participant, ParticipantId, PointsTable, Score,
    Side, Slot, Standing, Tournament, TournamentError, TournamentId, TournamentStatus,
};
pub use roster::parse_roster_csv;
pub use store::TournamentStore;
