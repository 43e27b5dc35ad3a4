//! Read side: bracket and standings views with display names joined in. Never mutates.

use crate::logic::lifecycle::completion_ready;
use crate::logic::standings::compute_standings;
use crate::models::{
    BracketNode, Draw, Fixture, Format, MatchId, ParticipantId, PointsTable, Score, Slot,
    Standing, Tournament, TournamentError, TournamentId, TournamentStatus,
};
use serde::Serialize;

/// Participant id with display name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ParticipantRef {
    pub id: ParticipantId,
    pub name: String,
}

/// How one side of a bracket match currently looks.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SlotView {
    Participant { id: ParticipantId, name: String },
    AwaitingWinner { match_id: MatchId },
    Bye,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// Still waiting for at least one side.
    Pending,
    /// Both sides known, awaiting a result.
    Ready,
    Decided,
    /// Decided by a bye, no match played.
    Walkover,
}

#[derive(Clone, Debug, Serialize)]
pub struct NodeView {
    pub id: MatchId,
    pub round: u32,
    pub position: u32,
    pub side_1: SlotView,
    pub side_2: SlotView,
    pub score: Option<Score>,
    pub winner: Option<ParticipantRef>,
    pub state: MatchState,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoundView {
    pub round: u32,
    pub name: String,
    pub matches: Vec<NodeView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FixtureView {
    pub id: MatchId,
    pub round: u32,
    pub player_1: ParticipantRef,
    pub player_2: ParticipantRef,
    pub score: Option<Score>,
    pub winner: Option<ParticipantRef>,
    pub state: MatchState,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "format")]
pub enum DrawView {
    Knockout {
        rounds: Vec<RoundView>,
        champion: Option<ParticipantRef>,
    },
    RoundRobin {
        fixtures: Vec<FixtureView>,
        standings: Vec<Standing>,
    },
}

/// Everything a client needs to render the tournament.
#[derive(Clone, Debug, Serialize)]
pub struct TournamentView {
    pub id: TournamentId,
    pub name: String,
    pub format: Format,
    pub status: TournamentStatus,
    pub version: u64,
    /// Matches with both sides known and no result yet.
    pub ready_matches: Vec<MatchId>,
    /// Whether an explicit move to Completed would be accepted.
    pub completion_ready: bool,
    pub draw: DrawView,
}

/// Ids of matches currently awaiting a result.
pub fn pending_matches(tournament: &Tournament) -> Result<Vec<MatchId>, TournamentError> {
    Ok(tournament.draw()?.ready_matches())
}

/// Build the full view of a tournament whose draw exists.
pub fn assemble_view(
    tournament: &Tournament,
    points: &PointsTable,
) -> Result<TournamentView, TournamentError> {
    let draw = tournament.draw()?;
    let draw_view = match draw {
        Draw::Knockout(nodes) => knockout_view(tournament, nodes),
        Draw::RoundRobin(fixtures) => DrawView::RoundRobin {
            fixtures: fixtures.iter().map(|f| fixture_view(tournament, f)).collect(),
            standings: compute_standings(tournament, points)?,
        },
    };
    Ok(TournamentView {
        id: tournament.id,
        name: tournament.name.clone(),
        format: tournament.format,
        status: tournament.status,
        version: tournament.version,
        ready_matches: draw.ready_matches(),
        completion_ready: completion_ready(tournament),
        draw: draw_view,
    })
}

fn participant_ref(tournament: &Tournament, id: ParticipantId) -> ParticipantRef {
    ParticipantRef {
        id,
        name: tournament.display_name(id),
    }
}

fn round_name(round: u32, total: u32) -> String {
    match total - round {
        1 => "Final".to_string(),
        2 => "Semi-finals".to_string(),
        3 => "Quarter-finals".to_string(),
        _ => format!("Round {}", round + 1),
    }
}

fn knockout_view(tournament: &Tournament, nodes: &[BracketNode]) -> DrawView {
    let total = nodes.iter().map(|n| n.round + 1).max().unwrap_or(0);
    let mut rounds: Vec<RoundView> = (0..total)
        .map(|round| RoundView {
            round,
            name: round_name(round, total),
            matches: Vec::new(),
        })
        .collect();

    let slot_view = |slot: Slot| match slot {
        Slot::Participant(id) => SlotView::Participant {
            id,
            name: tournament.display_name(id),
        },
        Slot::WinnerOf(idx) => match nodes.get(idx) {
            Some(feeder) => SlotView::AwaitingWinner { match_id: feeder.id },
            None => SlotView::Bye,
        },
        Slot::Bye => SlotView::Bye,
    };

    for node in nodes {
        let state = match (node.winner, node.score) {
            (Some(_), None) => MatchState::Walkover,
            (Some(_), Some(_)) => MatchState::Decided,
            _ if node.is_ready() => MatchState::Ready,
            _ => MatchState::Pending,
        };
        rounds[node.round as usize].matches.push(NodeView {
            id: node.id,
            round: node.round,
            position: node.position,
            side_1: slot_view(node.slot_1),
            side_2: slot_view(node.slot_2),
            score: node.score,
            winner: node.winner.map(|id| participant_ref(tournament, id)),
            state,
        });
    }

    let champion = nodes
        .iter()
        .find(|n| n.downstream.is_none())
        .and_then(|n| n.winner)
        .map(|id| participant_ref(tournament, id));
    DrawView::Knockout { rounds, champion }
}

fn fixture_view(tournament: &Tournament, fixture: &Fixture) -> FixtureView {
    FixtureView {
        id: fixture.id,
        round: fixture.round,
        player_1: participant_ref(tournament, fixture.player_1),
        player_2: participant_ref(tournament, fixture.player_2),
        score: fixture.score,
        winner: fixture.winner().map(|id| participant_ref(tournament, id)),
        state: if fixture.is_resolved() {
            MatchState::Decided
        } else {
            MatchState::Ready
        },
    }
}
