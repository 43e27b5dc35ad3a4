//! Matches: knockout bracket nodes, round robin fixtures, slots and scores.

use crate::models::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match (bracket node or fixture).
pub type MatchId = Uuid;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

/// Recorded score of a played match: points of side one and side two.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub first: u32,
    pub second: u32,
}

impl Score {
    pub fn new(first: u32, second: u32) -> Self {
        Self { first, second }
    }

    /// Side with the higher score, `None` for a draw.
    pub fn winning_side(&self) -> Option<Side> {
        match self.first.cmp(&self.second) {
            std::cmp::Ordering::Greater => Some(Side::One),
            std::cmp::Ordering::Less => Some(Side::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Points (scored, conceded) from the point of view of `side`.
    pub fn for_side(&self, side: Side) -> (u32, u32) {
        match side {
            Side::One => (self.first, self.second),
            Side::Two => (self.second, self.first),
        }
    }
}

/// One input slot of a bracket node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "ref")]
pub enum Slot {
    /// A concrete participant.
    Participant(ParticipantId),
    /// Placeholder for the winner of the node at this arena index.
    WinnerOf(usize),
    /// Permanent bye: no opponent will ever arrive.
    Bye,
}

impl Slot {
    pub fn participant(&self) -> Option<ParticipantId> {
        match self {
            Slot::Participant(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }
}

/// A single knockout match in the bracket arena.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketNode {
    pub id: MatchId,
    /// 0 = first round.
    pub round: u32,
    /// Position within the round, top of the draw first.
    pub position: u32,
    pub slot_1: Slot,
    pub slot_2: Slot,
    /// None until played. Stays None for a walkover.
    pub score: Option<Score>,
    /// None until decided. Never overwritten once set.
    pub winner: Option<ParticipantId>,
    /// Arena index of the node the winner moves on to; None for the final.
    pub downstream: Option<usize>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl BracketNode {
    pub fn new(round: u32, position: u32, slot_1: Slot, slot_2: Slot, downstream: Option<usize>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            position,
            slot_1,
            slot_2,
            score: None,
            winner: None,
            downstream,
            recorded_at: None,
        }
    }

    pub fn slot(&self, side: Side) -> Slot {
        match side {
            Side::One => self.slot_1,
            Side::Two => self.slot_2,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    /// Both sides are concrete participants and no winner is set.
    pub fn is_ready(&self) -> bool {
        !self.is_resolved()
            && self.slot_1.participant().is_some()
            && self.slot_2.participant().is_some()
    }

    /// Exactly one side is a bye: the other side advances without playing.
    pub fn is_walkover(&self) -> bool {
        self.slot_1.is_bye() != self.slot_2.is_bye()
    }

    /// Which slot of the downstream node this node's winner fills.
    pub fn feeds_side(&self) -> Side {
        if self.position % 2 == 0 {
            Side::One
        } else {
            Side::Two
        }
    }
}

/// One round robin pairing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: MatchId,
    /// Scheduling round from the circle method (0-based).
    pub round: u32,
    pub player_1: ParticipantId,
    pub player_2: ParticipantId,
    /// None if not yet played.
    pub score: Option<Score>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Fixture {
    pub fn new(round: u32, player_1: ParticipantId, player_2: ParticipantId) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            player_1,
            player_2,
            score: None,
            recorded_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.score.is_some()
    }

    pub fn involves(&self, id: ParticipantId) -> bool {
        self.player_1 == id || self.player_2 == id
    }

    /// Side `id` plays on, if they take part in this fixture.
    pub fn side_of(&self, id: ParticipantId) -> Option<Side> {
        if self.player_1 == id {
            Some(Side::One)
        } else if self.player_2 == id {
            Some(Side::Two)
        } else {
            None
        }
    }

    /// Winner of a resolved, non-drawn fixture.
    pub fn winner(&self) -> Option<ParticipantId> {
        self.score
            .and_then(|s| s.winning_side())
            .map(|side| match side {
                Side::One => self.player_1,
                Side::Two => self.player_2,
            })
    }
}
