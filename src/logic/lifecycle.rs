//! Lifecycle: Upcoming -> InProgress -> Completed, never backwards.

use crate::models::{Draw, Tournament, TournamentError, TournamentStatus};

/// Whether an explicit move to Completed would be accepted right now.
///
/// Only round robin tournaments complete on request, once every fixture has a result.
/// Knockout tournaments complete by themselves when the final is decided.
pub fn completion_ready(tournament: &Tournament) -> bool {
    if tournament.status != TournamentStatus::InProgress {
        return false;
    }
    match &tournament.draw {
        Some(Draw::RoundRobin(fixtures)) => fixtures.iter().all(|f| f.is_resolved()),
        _ => false,
    }
}

/// Apply an explicit status change requested by the caller.
pub fn transition_status(
    tournament: &mut Tournament,
    to: TournamentStatus,
) -> Result<(), TournamentError> {
    use TournamentStatus::*;
    let from = tournament.status;
    let invalid = TournamentError::InvalidStateTransition { from, to };

    match (from, to) {
        (Upcoming, InProgress) => {
            // Results recorded while Upcoming start the tournament implicitly,
            // so a draw with results here means the state is already past this point.
            let draw = tournament.draw()?;
            if draw.has_results() {
                return Err(invalid);
            }
        }
        (InProgress, Completed) => {
            if !completion_ready(tournament) {
                return Err(invalid);
            }
        }
        _ => return Err(invalid),
    }

    log::info!("Tournament {} moved from {} to {}", tournament.id, from, to);
    tournament.status = to;
    tournament.touch();
    Ok(())
}
