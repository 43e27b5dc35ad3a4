//! Round robin standings: tally resolved fixtures and rank with tie-breaks.

use crate::models::{
    Draw, Fixture, Format, ParticipantId, PointsTable, Standing, Tournament, TournamentError,
};
use std::cmp::Ordering;

/// Standings for a round robin tournament, rank 1 first.
///
/// Order: points, wins, head-to-head (only for a pair tied on both), point difference,
/// then enrollment order. Every rank is distinct.
pub fn compute_standings(
    tournament: &Tournament,
    points: &PointsTable,
) -> Result<Vec<Standing>, TournamentError> {
    let fixtures = match tournament.draw()? {
        Draw::RoundRobin(fixtures) => fixtures,
        Draw::Knockout(_) => {
            return Err(TournamentError::FormatMismatch {
                expected: Format::RoundRobin,
            })
        }
    };

    let mut table: Vec<Standing> = tournament
        .participants
        .iter()
        .map(|p| tally(p.id, p.name.clone(), fixtures, points))
        .collect();

    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then(b.point_difference().cmp(&a.point_difference()))
            .then(
                tournament
                    .enrollment_index(a.participant_id)
                    .cmp(&tournament.enrollment_index(b.participant_id)),
            )
    });
    apply_head_to_head(&mut table, fixtures);

    for (i, s) in table.iter_mut().enumerate() {
        s.rank = i as u32 + 1;
    }
    Ok(table)
}

fn tally(
    id: ParticipantId,
    name: String,
    fixtures: &[Fixture],
    points: &PointsTable,
) -> Standing {
    let mut standing = Standing {
        participant_id: id,
        name,
        ..Standing::default()
    };
    for f in fixtures {
        let (Some(score), Some(side)) = (f.score, f.side_of(id)) else {
            continue;
        };
        let (scored, conceded) = score.for_side(side);
        standing.played += 1;
        standing.points_for += u64::from(scored);
        standing.points_against += u64::from(conceded);
        match scored.cmp(&conceded) {
            Ordering::Greater => {
                standing.wins += 1;
                standing.points += u64::from(points.win);
            }
            Ordering::Less => {
                standing.losses += 1;
                standing.points += u64::from(points.loss);
            }
            Ordering::Equal => {
                standing.draws += 1;
                standing.points += u64::from(points.draw);
            }
        }
    }
    standing
}

/// Within groups of exactly two tied on points and wins, the head-to-head winner goes first.
fn apply_head_to_head(table: &mut [Standing], fixtures: &[Fixture]) {
    let mut start = 0;
    while start < table.len() {
        let mut end = start + 1;
        while end < table.len()
            && table[end].points == table[start].points
            && table[end].wins == table[start].wins
        {
            end += 1;
        }
        if end - start == 2 {
            let (upper, lower) = (table[start].participant_id, table[start + 1].participant_id);
            let winner = fixtures
                .iter()
                .find(|f| f.involves(upper) && f.involves(lower))
                .and_then(Fixture::winner);
            if winner == Some(lower) {
                table.swap(start, start + 1);
            }
        }
        start = end;
    }
}
