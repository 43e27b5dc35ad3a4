//! Engine facade: the inbound operations, keyed by tournament id.
//!
//! The engine only carries configuration. All tournament state lives in the
//! [`TournamentStore`] the caller passes in.

use crate::logic::{
    assemble_view, build_draw, compute_standings, pending_matches, record_result,
    transition_status, TournamentView,
};
use crate::models::{
    Format, MatchId, Participant, PointsTable, Standing, Tournament, TournamentError,
    TournamentId, TournamentStatus,
};
use crate::store::TournamentStore;

#[derive(Clone, Debug, Default)]
pub struct Engine {
    pub points: PointsTable,
}

impl Engine {
    pub fn new(points: PointsTable) -> Self {
        Self { points }
    }

    /// Register a new Upcoming tournament without a draw.
    pub fn create_tournament(
        &self,
        store: &TournamentStore,
        name: impl Into<String>,
        format: Format,
    ) -> Tournament {
        let tournament = Tournament::new(name, format);
        log::info!(
            "Created {} tournament {} ({})",
            format,
            tournament.name,
            tournament.id
        );
        store.insert(tournament.clone());
        tournament
    }

    /// Build the bracket or fixture list once. Rebuilding is refused with `AlreadyBuilt`.
    pub fn build_bracket(
        &self,
        store: &TournamentStore,
        id: TournamentId,
        participants: Vec<Participant>,
    ) -> Result<TournamentView, TournamentError> {
        store.update(id, None, |t| {
            build_draw(t, participants)?;
            assemble_view(t, &self.points)
        })
    }

    /// Record one match result. Pass the version from the last read to guard against
    /// concurrent edits; a mismatch fails with the retryable `Conflict`.
    pub fn record_result(
        &self,
        store: &TournamentStore,
        id: TournamentId,
        match_id: MatchId,
        score_1: i64,
        score_2: i64,
        expected_version: Option<u64>,
    ) -> Result<TournamentView, TournamentError> {
        store.update(id, expected_version, |t| {
            record_result(t, match_id, score_1, score_2)?;
            assemble_view(t, &self.points)
        })
    }

    pub fn transition_status(
        &self,
        store: &TournamentStore,
        id: TournamentId,
        status: TournamentStatus,
    ) -> Result<Tournament, TournamentError> {
        store.update(id, None, |t| {
            transition_status(t, status)?;
            Ok(t.clone())
        })
    }

    pub fn bracket_view(
        &self,
        store: &TournamentStore,
        id: TournamentId,
    ) -> Result<TournamentView, TournamentError> {
        store.read(id, |t| assemble_view(t, &self.points))
    }

    pub fn standings(
        &self,
        store: &TournamentStore,
        id: TournamentId,
    ) -> Result<Vec<Standing>, TournamentError> {
        store.read(id, |t| compute_standings(t, &self.points))
    }

    pub fn pending_matches(
        &self,
        store: &TournamentStore,
        id: TournamentId,
    ) -> Result<Vec<MatchId>, TournamentError> {
        store.read(id, pending_matches)
    }

    /// Drop a tournament and everything it owns.
    pub fn remove_tournament(
        &self,
        store: &TournamentStore,
        id: TournamentId,
    ) -> Result<Tournament, TournamentError> {
        let removed = store.remove(id)?;
        log::info!("Removed tournament {} ({})", removed.name, id);
        Ok(removed)
    }
}
