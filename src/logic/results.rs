//! Match results: validate a submitted score, record it, and move the winner on.

use crate::logic::bracket::advance;
use crate::models::{
    BracketNode, Draw, Fixture, MatchId, Score, Side, Tournament, TournamentError,
    TournamentStatus,
};
use chrono::Utc;

/// Highest score accepted for one side of a match.
pub const MAX_SCORE: u32 = 999;

/// Scores must lie in `0..=MAX_SCORE` and must not tie.
pub fn validate_score(first: i64, second: i64) -> Result<Score, TournamentError> {
    let invalid = TournamentError::InvalidScore { first, second };
    if first == second {
        return Err(invalid);
    }
    match (u32::try_from(first), u32::try_from(second)) {
        (Ok(a), Ok(b)) if a <= MAX_SCORE && b <= MAX_SCORE => Ok(Score::new(a, b)),
        _ => Err(invalid),
    }
}

/// Record the result of one match.
///
/// Checks, in order: tournament not completed, draw built, match exists, not already recorded,
/// both sides known, score valid. Nothing is written unless every check passes.
///
/// The first result moves an Upcoming tournament to InProgress. Deciding the knockout final
/// completes the tournament.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    first: i64,
    second: i64,
) -> Result<(), TournamentError> {
    if tournament.status == TournamentStatus::Completed {
        return Err(TournamentError::TournamentCompleted);
    }
    let draw = tournament.draw.as_mut().ok_or(TournamentError::NotBuilt)?;
    let decided_final = match draw {
        Draw::Knockout(nodes) => record_knockout(nodes, match_id, first, second)?,
        Draw::RoundRobin(fixtures) => {
            record_fixture(fixtures, match_id, first, second)?;
            false
        }
    };

    log::info!(
        "Recorded {}-{} for match {} in tournament {}",
        first,
        second,
        match_id,
        tournament.id
    );
    if tournament.status == TournamentStatus::Upcoming {
        log::info!("Tournament {} started by its first result", tournament.id);
        tournament.status = TournamentStatus::InProgress;
    }
    if decided_final {
        log::info!("Tournament {} completed: final decided", tournament.id);
        tournament.status = TournamentStatus::Completed;
    }
    tournament.touch();
    Ok(())
}

/// Returns whether the recorded node was the final.
fn record_knockout(
    nodes: &mut [BracketNode],
    match_id: MatchId,
    first: i64,
    second: i64,
) -> Result<bool, TournamentError> {
    let idx = nodes
        .iter()
        .position(|n| n.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let node = &nodes[idx];
    if node.is_resolved() {
        return Err(TournamentError::AlreadyRecorded(match_id));
    }
    let (player_1, player_2) = match (
        node.slot(Side::One).participant(),
        node.slot(Side::Two).participant(),
    ) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(TournamentError::NotReady(match_id)),
    };
    let score = validate_score(first, second)?;
    let winner = match score.winning_side() {
        Some(Side::One) => player_1,
        Some(Side::Two) => player_2,
        None => return Err(TournamentError::InvalidScore { first, second }),
    };

    let node = &mut nodes[idx];
    node.score = Some(score);
    node.winner = Some(winner);
    node.recorded_at = Some(Utc::now());
    let is_final = node.downstream.is_none();

    advance(nodes, idx);
    Ok(is_final)
}

fn record_fixture(
    fixtures: &mut [Fixture],
    match_id: MatchId,
    first: i64,
    second: i64,
) -> Result<(), TournamentError> {
    let fixture = fixtures
        .iter_mut()
        .find(|f| f.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if fixture.is_resolved() {
        return Err(TournamentError::AlreadyRecorded(match_id));
    }
    let score = validate_score(first, second)?;
    fixture.score = Some(score);
    fixture.recorded_at = Some(Utc::now());
    Ok(())
}
