//! Standing (derived per participant) and the points table that produces it.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// League points awarded per outcome.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointsTable {
    pub win: u32,
    /// Kept for rulesets that allow drawn fixtures; tied scores are currently rejected.
    pub draw: u32,
    pub loss: u32,
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            loss: 0,
        }
    }
}

/// One row of the round robin table. Recomputed on demand, never stored.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based, unique.
    pub rank: u32,
    pub participant_id: ParticipantId,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u64,
    pub points_for: u64,
    pub points_against: u64,
}

impl Standing {
    pub fn point_difference(&self) -> i64 {
        (self.points_for as i64).saturating_sub(self.points_against as i64)
    }
}
