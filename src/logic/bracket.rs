//! Draw building: knockout bracket arena or round robin fixture list, plus winner propagation.

use crate::logic::pairing::{assign_byes, generate_round_robin_fixtures};
use crate::models::{
    BracketNode, Draw, Fixture, Format, MatchId, Participant, ParticipantId, Side, Slot,
    Tournament, TournamentError,
};
use std::collections::HashSet;

/// Reject rosters the draw cannot be built from: fewer than 2, blank names, duplicate ids,
/// seed 0, or duplicate seeds.
pub fn validate_roster(participants: &[Participant]) -> Result<(), TournamentError> {
    if participants.len() < 2 {
        return Err(TournamentError::InvalidRoster(format!(
            "need at least 2 participants, got {}",
            participants.len()
        )));
    }
    let mut ids = HashSet::new();
    let mut seeds = HashSet::new();
    for p in participants {
        if p.name.trim().is_empty() {
            return Err(TournamentError::InvalidRoster(format!(
                "participant {} has no name",
                p.id
            )));
        }
        if !ids.insert(p.id) {
            return Err(TournamentError::InvalidRoster(format!(
                "participant {} ({}) is enrolled twice",
                p.id, p.name
            )));
        }
        if let Some(seed) = p.seed {
            if seed == 0 {
                return Err(TournamentError::InvalidRoster(format!(
                    "{} has seed 0; seeds start at 1",
                    p.name
                )));
            }
            if !seeds.insert(seed) {
                return Err(TournamentError::InvalidRoster(format!(
                    "seed {} is assigned more than once",
                    seed
                )));
            }
        }
    }
    Ok(())
}

/// Build the draw for the tournament's format and store the roster alongside it.
///
/// Returns the ids of matches that are ready to play straight away. Walkovers are already
/// resolved at this point.
pub fn build_draw(
    tournament: &mut Tournament,
    participants: Vec<Participant>,
) -> Result<Vec<MatchId>, TournamentError> {
    if tournament.is_built() {
        return Err(TournamentError::AlreadyBuilt);
    }
    validate_roster(&participants)?;

    let draw = match tournament.format {
        Format::Knockout => Draw::Knockout(build_knockout(&participants)),
        Format::RoundRobin => Draw::RoundRobin(build_round_robin(&participants)),
    };
    let ready = draw.ready_matches();
    log::info!(
        "Built {} draw for tournament {}: {} participants, {} ready to play",
        tournament.format,
        tournament.id,
        participants.len(),
        ready.len()
    );

    tournament.participants = participants;
    tournament.draw = Some(draw);
    tournament.touch();
    Ok(ready)
}

/// Build every node of a single elimination bracket, then settle walkovers.
///
/// Nodes are laid out round by round; the node at `(round, position)` feeds
/// `(round + 1, position / 2)`, filling slot 1 from an even position and slot 2 from an odd one.
pub fn build_knockout(participants: &[Participant]) -> Vec<BracketNode> {
    let slots = assign_byes(participants);
    let size = slots.len();
    if size < 2 {
        return Vec::new();
    }
    let rounds = size.trailing_zeros();

    let mut nodes: Vec<BracketNode> = Vec::with_capacity(size - 1);
    let mut previous_offset = 0;
    for round in 0..rounds {
        let offset = nodes.len();
        let count = size >> (round + 1);
        let next_offset = offset + count;
        for position in 0..count {
            let downstream = (round + 1 < rounds).then(|| next_offset + position / 2);
            let (slot_1, slot_2) = if round == 0 {
                (slots[2 * position], slots[2 * position + 1])
            } else {
                (
                    Slot::WinnerOf(previous_offset + 2 * position),
                    Slot::WinnerOf(previous_offset + 2 * position + 1),
                )
            };
            nodes.push(BracketNode::new(
                round,
                position as u32,
                slot_1,
                slot_2,
                downstream,
            ));
        }
        previous_offset = offset;
    }

    for idx in 0..size / 2 {
        if let Some(winner) = walkover_winner(&nodes[idx]) {
            nodes[idx].winner = Some(winner);
            advance(&mut nodes, idx);
        }
    }
    nodes
}

/// One fixture per unordered pair.
pub fn build_round_robin(participants: &[Participant]) -> Vec<Fixture> {
    generate_round_robin_fixtures(participants)
        .into_iter()
        .map(|(round, a, b)| Fixture::new(round, a, b))
        .collect()
}

/// The participant that advances unopposed from an undecided node with exactly one bye.
fn walkover_winner(node: &BracketNode) -> Option<ParticipantId> {
    if node.is_resolved() {
        return None;
    }
    match (node.slot_1, node.slot_2) {
        (Slot::Participant(id), Slot::Bye) | (Slot::Bye, Slot::Participant(id)) => Some(id),
        _ => None,
    }
}

/// Move the winner of `from` into its downstream slot, settling any walkover this creates.
pub(crate) fn advance(nodes: &mut [BracketNode], from: usize) {
    let mut pending = vec![from];
    while let Some(idx) = pending.pop() {
        let node = &nodes[idx];
        let (winner, downstream) = match (node.winner, node.downstream) {
            (Some(winner), Some(downstream)) => (winner, downstream),
            _ => continue,
        };
        let side = node.feeds_side();

        let next = &mut nodes[downstream];
        match side {
            Side::One => next.slot_1 = Slot::Participant(winner),
            Side::Two => next.slot_2 = Slot::Participant(winner),
        }
        log::debug!(
            "Advanced {} into round {} position {}",
            winner,
            next.round,
            next.position
        );

        if let Some(unopposed) = walkover_winner(next) {
            next.winner = Some(unopposed);
            pending.push(downstream);
        }
    }
}
