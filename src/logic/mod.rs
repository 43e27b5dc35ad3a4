//! Tournament business logic: pairing, draw building, results, standings, lifecycle, views.

mod bracket;
mod lifecycle;
mod pairing;
mod results;
mod standings;
mod view;

pub use bracket::{build_draw, build_knockout, build_round_robin, validate_roster};
pub use lifecycle::{completion_ready, transition_status};
pub use pairing::{assign_byes, generate_round_robin_fixtures, next_power_of_two, seed_order};
pub use results::{record_result, validate_score, MAX_SCORE};
pub use standings::compute_standings;
pub use view::{
    assemble_view, pending_matches, DrawView, FixtureView, MatchState, NodeView, ParticipantRef,
    RoundView, SlotView, TournamentView,
};
