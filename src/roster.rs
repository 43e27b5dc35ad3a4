//! Roster import from CSV: one participant per row, `name[,seed[,id]]` with a header line.

use crate::models::{Participant, TournamentError};
use serde::Deserialize;
use std::io::Read;
use uuid::Uuid;

#[derive(Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    seed: Option<u32>,
    #[serde(default)]
    id: Option<Uuid>,
}

/// Parse participants in file order (which becomes the enrollment order).
///
/// Rows without an id get a fresh one. Any malformed row rejects the whole roster.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<Participant>, TournamentError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut participants = Vec::new();
    for (line, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = row.map_err(|e| {
            TournamentError::InvalidRoster(format!("row {}: {}", line + 1, e))
        })?;
        let participant = Participant::with_id(row.id.unwrap_or_else(Uuid::new_v4), row.name);
        participants.push(match row.seed {
            Some(seed) => participant.seeded(seed),
            None => participant,
        });
    }
    log::debug!("Parsed {} participants from roster CSV", participants.len());
    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_seeds_and_ids() {
        let id = Uuid::new_v4();
        let data = format!("name,seed,id\nAnna,1,\nBen,,{id}\nCleo,2,\n");
        let roster = parse_roster_csv(data.as_bytes()).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].name, "Anna");
        assert_eq!(roster[0].seed, Some(1));
        assert_eq!(roster[1].id, id);
        assert_eq!(roster[1].seed, None);
        assert_eq!(roster[2].seed, Some(2));
    }

    #[test]
    fn name_only_roster() {
        let roster = parse_roster_csv("name\nAnna\nBen\n".as_bytes()).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.iter().all(|p| p.seed.is_none()));
        assert_ne!(roster[0].id, roster[1].id);
    }

    #[test]
    fn bad_seed_is_rejected() {
        let err = parse_roster_csv("name,seed\nAnna,first\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidRoster(_)));
    }
}
