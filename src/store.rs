//! In-memory tournament store with one lock per tournament.
//!
//! Writers to a tournament hold its write lock for the whole command, so readers never see a
//! recorded winner without its propagated downstream slot. Commands run against a draft copy
//! that only replaces the stored tournament when the command succeeds.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type Entry = Arc<RwLock<Tournament>>;

#[derive(Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Entry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tournament, returning its id.
    pub fn insert(&self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        self.tournaments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(RwLock::new(tournament)));
        id
    }

    /// Remove a tournament together with its draw.
    pub fn remove(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let entry = self
            .tournaments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        let tournament = entry.read().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(tournament)
    }

    pub fn len(&self) -> usize {
        self.tournaments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, id: TournamentId) -> Result<Entry, TournamentError> {
        self.tournaments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Snapshot of a tournament.
    pub fn get(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.read(id, |t| Ok(t.clone()))
    }

    /// Run a read-only query under the tournament's read lock.
    pub fn read<T>(
        &self,
        id: TournamentId,
        query: impl FnOnce(&Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let entry = self.entry(id)?;
        let guard = entry.read().unwrap_or_else(PoisonError::into_inner);
        query(&guard)
    }

    /// Run a command under the tournament's write lock.
    ///
    /// With `expected_version` set, the command is refused with `Conflict` if the tournament has
    /// changed since the caller read it. On error the stored tournament is left untouched.
    pub fn update<T>(
        &self,
        id: TournamentId,
        expected_version: Option<u64>,
        command: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let entry = self.entry(id)?;
        let mut guard = entry.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(expected) = expected_version {
            if guard.version != expected {
                return Err(TournamentError::Conflict {
                    expected,
                    actual: guard.version,
                });
            }
        }
        let mut draft = guard.clone();
        let out = command(&mut draft)?;
        *guard = draft;
        Ok(out)
    }
}
